//! Ledger invariants checked by the test modules.

use crate::types::{Job, Money, Profile};

/// INV-1: No profile ever holds a negative balance.
pub fn assert_balances_non_negative(profiles: &[Profile]) {
    for profile in profiles {
        assert!(
            profile.balance >= Money::ZERO,
            "INV-1 violated: profile {} has negative balance {}",
            profile.id,
            profile.balance
        );
    }
}

/// INV-2: `paid` and `payment_date` are either both unset or both set.
pub fn assert_paid_coupling(job: &Job) {
    assert_eq!(
        job.is_paid(),
        job.paid_at().is_some(),
        "INV-2 violated: job {} has paid={:?} but payment_date={:?}",
        job.id,
        job.paid,
        job.payment_date
    );
}

/// INV-3: A settlement moves exactly `price` from client to contractor.
pub fn assert_conservation(
    client_before: &Profile,
    client_after: &Profile,
    contractor_before: &Profile,
    contractor_after: &Profile,
    price: Money,
) {
    assert_eq!(
        client_after.balance.cents(),
        client_before.balance.cents() - price.cents(),
        "INV-3 violated: client {} debit is not exactly {}",
        client_before.id,
        price
    );
    assert_eq!(
        contractor_after.balance.cents(),
        contractor_before.balance.cents() + price.cents(),
        "INV-3 violated: contractor {} credit is not exactly {}",
        contractor_before.id,
        price
    );
}

/// INV-4: A rejected operation leaves every balance and job untouched.
pub fn assert_unchanged(
    profiles_before: &[Profile],
    profiles_after: &[Profile],
    jobs_before: &[Job],
    jobs_after: &[Job],
) {
    assert_eq!(
        profiles_before, profiles_after,
        "INV-4 violated: balances changed after a rejected operation"
    );
    assert_eq!(
        jobs_before, jobs_after,
        "INV-4 violated: jobs changed after a rejected operation"
    );
}

/// Run all stateless invariants over a full table scan.
pub fn assert_all_invariants(profiles: &[Profile], jobs: &[Job]) {
    assert_balances_non_negative(profiles);
    for job in jobs {
        assert_paid_coupling(job);
    }
}
