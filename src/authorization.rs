//! Record access policy.
//!
//! The grant table mirrors the declarative per-model rules of the data
//! schema: each entity/operation pair is granted either to the record
//! owner or to the Doctors group. Evaluated default-deny.
//!
//! Ownership is positional, not historical: the owner of an appointment
//! or medical record is whoever the `patient_id` field names, never
//! "whoever created it". A profile's owner is the profile id itself.

use crate::identity::{Group, Identity};

// ─── Policy vocabulary ────────────────────────────────────────────────────────

/// Entities covered by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    UserProfile,
    Appointment,
    MedicalRecord,
}

/// Operations covered by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

/// Who a single grant applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grantee {
    /// The identity named by the record's owner field.
    Owner,
    /// Any identity in the group.
    InGroup(Group),
}

/// The full grant table. Anything not listed here is denied.
const GRANTS: &[(Entity, Operation, Grantee)] = &[
    // Profiles: full CRUD for the identity itself, read for doctors.
    (Entity::UserProfile, Operation::Create, Grantee::Owner),
    (Entity::UserProfile, Operation::Read, Grantee::Owner),
    (Entity::UserProfile, Operation::Update, Grantee::Owner),
    (Entity::UserProfile, Operation::Delete, Grantee::Owner),
    (Entity::UserProfile, Operation::Read, Grantee::InGroup(Group::Doctors)),
    // Appointments: full CRUD for the owning patient, read/update for doctors.
    (Entity::Appointment, Operation::Create, Grantee::Owner),
    (Entity::Appointment, Operation::Read, Grantee::Owner),
    (Entity::Appointment, Operation::Update, Grantee::Owner),
    (Entity::Appointment, Operation::Delete, Grantee::Owner),
    (Entity::Appointment, Operation::Read, Grantee::InGroup(Group::Doctors)),
    (Entity::Appointment, Operation::Update, Grantee::InGroup(Group::Doctors)),
    // Records: doctors create and read, the owning patient reads.
    (Entity::MedicalRecord, Operation::Create, Grantee::InGroup(Group::Doctors)),
    (Entity::MedicalRecord, Operation::Read, Grantee::InGroup(Group::Doctors)),
    (Entity::MedicalRecord, Operation::Read, Grantee::Owner),
];

// ─── Decision ─────────────────────────────────────────────────────────────────

/// Why access was allowed (or denied).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessReason {
    /// Caller is the identity named by the record's owner field.
    Owner,
    /// Caller is in a group the grant names.
    InGroup(Group),
    /// No matching grant.
    Denied,
}

/// Result of a policy check.
#[derive(Debug, Clone, Copy)]
pub struct AccessDecision {
    pub allowed: bool,
    pub reason: AccessReason,
}

impl AccessDecision {
    fn allow(reason: AccessReason) -> Self {
        Self {
            allowed: true,
            reason,
        }
    }

    fn deny() -> Self {
        Self {
            allowed: false,
            reason: AccessReason::Denied,
        }
    }
}

/// Check one operation on one record against the grant table.
///
/// `owner_id` is the value of the record's owner field: `patient_id`
/// for appointments and medical records, the profile id for profiles.
/// For Create the caller passes the owner field of the record it is
/// about to write.
pub fn check_access(
    caller: &Identity,
    entity: Entity,
    op: Operation,
    owner_id: &str,
) -> AccessDecision {
    for (granted_entity, granted_op, grantee) in GRANTS {
        if *granted_entity != entity || *granted_op != op {
            continue;
        }
        match grantee {
            Grantee::Owner if caller.id == owner_id => {
                return AccessDecision::allow(AccessReason::Owner);
            }
            Grantee::InGroup(group) if caller.in_group(*group) => {
                return AccessDecision::allow(AccessReason::InGroup(*group));
            }
            _ => {}
        }
    }
    AccessDecision::deny()
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Profiles ─────────────────────────────────────────

    #[test]
    fn profile_owner_has_full_crud() {
        let alice = Identity::patient("alice");
        for op in [
            Operation::Create,
            Operation::Read,
            Operation::Update,
            Operation::Delete,
        ] {
            let decision = check_access(&alice, Entity::UserProfile, op, "alice");
            assert!(decision.allowed, "owner should be allowed {op:?}");
            assert_eq!(decision.reason, AccessReason::Owner);
        }
    }

    #[test]
    fn doctor_reads_any_profile_but_cannot_write() {
        let drbob = Identity::doctor("drbob");
        let read = check_access(&drbob, Entity::UserProfile, Operation::Read, "alice");
        assert!(read.allowed);
        assert_eq!(read.reason, AccessReason::InGroup(Group::Doctors));

        for op in [Operation::Create, Operation::Update, Operation::Delete] {
            assert!(!check_access(&drbob, Entity::UserProfile, op, "alice").allowed);
        }
    }

    #[test]
    fn patient_cannot_read_foreign_profile() {
        let alice = Identity::patient("alice");
        assert!(!check_access(&alice, Entity::UserProfile, Operation::Read, "carol").allowed);
    }

    // ── Appointments ─────────────────────────────────────

    #[test]
    fn appointment_owner_has_full_crud() {
        let alice = Identity::patient("alice");
        for op in [
            Operation::Create,
            Operation::Read,
            Operation::Update,
            Operation::Delete,
        ] {
            assert!(check_access(&alice, Entity::Appointment, op, "alice").allowed);
        }
    }

    #[test]
    fn doctor_reads_and_updates_but_never_deletes_appointments() {
        let drbob = Identity::doctor("drbob");
        assert!(check_access(&drbob, Entity::Appointment, Operation::Read, "alice").allowed);
        assert!(check_access(&drbob, Entity::Appointment, Operation::Update, "alice").allowed);
        assert!(!check_access(&drbob, Entity::Appointment, Operation::Create, "alice").allowed);
        assert!(!check_access(&drbob, Entity::Appointment, Operation::Delete, "alice").allowed);
    }

    #[test]
    fn third_party_is_denied_on_appointments() {
        let carol = Identity::patient("carol");
        for op in [Operation::Read, Operation::Update, Operation::Delete] {
            let decision = check_access(&carol, Entity::Appointment, op, "alice");
            assert!(!decision.allowed);
            assert_eq!(decision.reason, AccessReason::Denied);
        }
    }

    #[test]
    fn ownership_follows_the_patient_field_not_the_creator() {
        // A doctor could have written the row; the grant still follows
        // whoever patient_id names.
        let alice = Identity::patient("alice");
        assert!(check_access(&alice, Entity::Appointment, Operation::Read, "alice").allowed);
        assert!(!check_access(&alice, Entity::Appointment, Operation::Read, "carol").allowed);
    }

    // ── Medical records ──────────────────────────────────

    #[test]
    fn doctor_creates_and_reads_records() {
        let drbob = Identity::doctor("drbob");
        assert!(check_access(&drbob, Entity::MedicalRecord, Operation::Create, "alice").allowed);
        assert!(check_access(&drbob, Entity::MedicalRecord, Operation::Read, "alice").allowed);
    }

    #[test]
    fn patient_reads_own_records_only() {
        let alice = Identity::patient("alice");
        assert!(check_access(&alice, Entity::MedicalRecord, Operation::Read, "alice").allowed);
        assert!(!check_access(&alice, Entity::MedicalRecord, Operation::Read, "carol").allowed);
    }

    #[test]
    fn nobody_updates_or_deletes_records() {
        // Records are immutable after creation; no grant exists at all.
        let drbob = Identity::doctor("drbob");
        let alice = Identity::patient("alice");
        for caller in [&drbob, &alice] {
            assert!(
                !check_access(caller, Entity::MedicalRecord, Operation::Update, "alice").allowed
            );
            assert!(
                !check_access(caller, Entity::MedicalRecord, Operation::Delete, "alice").allowed
            );
        }
    }

    #[test]
    fn patient_cannot_create_records_even_for_self() {
        let alice = Identity::patient("alice");
        assert!(!check_access(&alice, Entity::MedicalRecord, Operation::Create, "alice").allowed);
    }

    // ── Default deny ─────────────────────────────────────

    #[test]
    fn identity_with_no_groups_only_gets_ownership_grants() {
        let ghost = Identity::new("ghost", vec![]);
        assert!(check_access(&ghost, Entity::Appointment, Operation::Read, "ghost").allowed);
        assert!(!check_access(&ghost, Entity::Appointment, Operation::Read, "alice").allowed);
        assert!(!check_access(&ghost, Entity::MedicalRecord, Operation::Create, "ghost").allowed);
    }
}
