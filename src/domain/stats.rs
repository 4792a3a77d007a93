//! Dashboard counters derived from the participant list.

use serde::Serialize;
use utoipa::ToSchema;

use super::participant::{Participant, PaymentStatus, Tier};

/// Aggregate counts shown on the admin dashboard.
///
/// `free + paid == total` and `pending_payments <= paid` always hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct RegistryStats {
    /// All participants.
    pub total: usize,
    /// Free registrations.
    pub free: usize,
    /// Paid registrations.
    pub paid: usize,
    /// Paid registrations still pending payment.
    pub pending_payments: usize,
    /// Participants with confirmed attendance.
    pub attendance_confirmed: usize,
}

impl RegistryStats {
    /// Counts over `participants`.
    #[must_use]
    pub fn compute(participants: &[Participant]) -> Self {
        participants.iter().fold(Self::default(), |mut acc, p| {
            acc.total += 1;
            match p.tier {
                Tier::Free => acc.free += 1,
                Tier::Paid => {
                    acc.paid += 1;
                    if p.payment_status == PaymentStatus::Pending {
                        acc.pending_payments += 1;
                    }
                }
            }
            if p.attendance_confirmed {
                acc.attendance_confirmed += 1;
            }
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::participant::fixtures::participant;

    #[test]
    fn counts_tiers_payments_and_attendance() {
        let mut list = vec![
            participant("A", Tier::Free, 0),
            participant("B", Tier::Paid, 1),
            participant("C", Tier::Paid, 2),
            participant("D", Tier::Paid, 3),
        ];
        if let Some(p) = list.get_mut(1) {
            p.payment_status = PaymentStatus::Approved;
            p.attendance_confirmed = true;
        }
        if let Some(p) = list.get_mut(3) {
            p.payment_status = PaymentStatus::Cancelled;
        }

        let stats = RegistryStats::compute(&list);
        assert_eq!(
            stats,
            RegistryStats {
                total: 4,
                free: 1,
                paid: 3,
                pending_payments: 1,
                attendance_confirmed: 1,
            }
        );
        assert_eq!(stats.free + stats.paid, stats.total);
        assert!(stats.pending_payments <= stats.paid);
    }

    #[test]
    fn free_registrations_never_count_as_pending() {
        let mut p = participant("E", Tier::Free, 0);
        p.payment_status = PaymentStatus::Pending;
        let stats = RegistryStats::compute(&[p]);
        assert_eq!(stats.pending_payments, 0);
    }

    #[test]
    fn empty_list_is_all_zero() {
        assert_eq!(RegistryStats::compute(&[]), RegistryStats::default());
    }
}
