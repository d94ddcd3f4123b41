//! Overtime submission and approval through the service.

mod common;

use accrual_core::overtime::{ApprovalDecision, OvertimeError, OvertimeStatus, ValidationIssue};
use accrual_shared::types::Hours;
use common::{Harness, date, entry};

#[test]
fn test_submit_and_approve_updates_running_balance() {
    let h = Harness::new();
    let employee = h.employee("Sari");
    h.at(date(2026, 3, 9));

    let request = h
        .service
        .submit_overtime_request(
            employee,
            vec![entry(date(2026, 3, 7), 8), entry(date(2026, 3, 8), 5)],
            false,
        )
        .unwrap();
    assert_eq!(request.status, OvertimeStatus::Pending);
    assert_eq!(
        h.service.overtime_balance(employee).unwrap().current_balance,
        Hours::ZERO
    );

    let approved = h
        .service
        .decide_overtime_request(request.id, h.manager, ApprovalDecision::Approve, None)
        .unwrap();
    assert_eq!(approved.status, OvertimeStatus::Approved);
    assert_eq!(
        h.service.overtime_balance(employee).unwrap().current_balance,
        Hours::from_halves(13)
    );
}

#[test]
fn test_pending_date_blocks_new_submission() {
    let h = Harness::new();
    let employee = h.employee("Sari");
    h.at(date(2026, 3, 9));
    h.service
        .submit_overtime_request(employee, vec![entry(date(2026, 3, 7), 4)], false)
        .unwrap();

    let validation = h
        .service
        .validate_overtime_entries(employee, &[entry(date(2026, 3, 7), 2)])
        .unwrap();
    assert!(!validation.ok);
    assert!(
        validation
            .errors
            .iter()
            .any(|e| matches!(e.issue, ValidationIssue::DateAlreadyClaimed { .. }))
    );

    let result =
        h.service
            .submit_overtime_request(employee, vec![entry(date(2026, 3, 7), 2)], false);
    assert!(matches!(result, Err(OvertimeError::Validation(_))));
}

#[test]
fn test_duplicate_dates_in_batch_all_reported() {
    let h = Harness::new();
    let employee = h.employee("Sari");
    h.at(date(2026, 3, 9));
    let result = h.service.submit_overtime_request(
        employee,
        vec![
            entry(date(2026, 3, 7), 4),
            entry(date(2026, 3, 7), 4),
            entry(date(2026, 3, 8), 25),
        ],
        false,
    );
    let Err(OvertimeError::Validation(errors)) = result else {
        panic!("expected validation failure");
    };
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].entry_index, Some(1));
    assert_eq!(errors[1].entry_index, Some(2));
}

#[test]
fn test_weekday_entries_need_confirmation() {
    let h = Harness::new();
    let employee = h.employee("Sari");
    h.at(date(2026, 3, 9));

    let unconfirmed =
        h.service
            .submit_overtime_request(employee, vec![entry(date(2026, 3, 9), 4)], false);
    assert!(matches!(
        unconfirmed,
        Err(OvertimeError::WeekdayConfirmationRequired { .. })
    ));

    let confirmed =
        h.service
            .submit_overtime_request(employee, vec![entry(date(2026, 3, 9), 4)], true);
    assert!(confirmed.is_ok());
}

#[test]
fn test_revision_frees_dates_until_resubmitted() {
    let h = Harness::new();
    let employee = h.employee("Sari");
    h.at(date(2026, 3, 9));
    let request = h
        .service
        .submit_overtime_request(employee, vec![entry(date(2026, 3, 7), 4)], false)
        .unwrap();

    let sent_back = h
        .service
        .decide_overtime_request(
            request.id,
            h.manager,
            ApprovalDecision::RequestRevision,
            Some("Split by project".to_string()),
        )
        .unwrap();
    assert_eq!(sent_back.status, OvertimeStatus::RevisionRequested);

    let resubmitted = h
        .service
        .resubmit_overtime_request(
            request.id,
            employee,
            vec![entry(date(2026, 3, 7), 3), entry(date(2026, 3, 8), 2)],
            false,
        )
        .unwrap();
    assert_eq!(resubmitted.status, OvertimeStatus::Pending);
    assert_eq!(resubmitted.total_hours(), Hours::from_halves(5));
    assert_eq!(resubmitted.approval_chain.len(), 1);
}

#[test]
fn test_reject_without_comment_fails() {
    let h = Harness::new();
    let employee = h.employee("Sari");
    h.at(date(2026, 3, 9));
    let request = h
        .service
        .submit_overtime_request(employee, vec![entry(date(2026, 3, 7), 4)], false)
        .unwrap();

    let result =
        h.service
            .decide_overtime_request(request.id, h.manager, ApprovalDecision::Reject, None);
    assert!(matches!(result, Err(OvertimeError::CommentRequired)));
    assert_eq!(
        h.service.overtime_request(request.id).unwrap().status,
        OvertimeStatus::Pending
    );
}

#[test]
fn test_unknown_request() {
    let h = Harness::new();
    let missing = accrual_shared::types::OvertimeRequestId::new();
    let result =
        h.service
            .decide_overtime_request(missing, h.manager, ApprovalDecision::Approve, None);
    assert!(matches!(result, Err(OvertimeError::RequestNotFound(id)) if id == missing));
}

#[test]
fn test_approval_into_recapped_month_rejected() {
    let h = Harness::new();
    let employee = h.employee("Sari");
    h.at(date(2026, 3, 30));
    let late = h
        .service
        .submit_overtime_request(employee, vec![entry(date(2026, 3, 28), 4)], false)
        .unwrap();
    h.approved_overtime(employee, &[(date(2026, 3, 29), 4)]);

    h.at(date(2026, 4, 1));
    h.service
        .compute_recap(
            employee,
            accrual_core::overtime::RecapPeriod::new(2026, 3).unwrap(),
            h.manager,
        )
        .unwrap();

    let result =
        h.service
            .decide_overtime_request(late.id, h.manager, ApprovalDecision::Approve, None);
    assert!(matches!(
        result,
        Err(OvertimeError::EntriesInRecappedPeriod { .. })
    ));
}
