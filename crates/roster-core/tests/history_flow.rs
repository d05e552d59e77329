//! End-to-end flow through the employee service: create, update, delete,
//! then read the history back through listing, pagination, and comparison.

use std::sync::Arc;

use roster_core::{
    EmployeeService, EmployeeUpdate, FieldValue, NewEmployee, Operation, RosterError,
    SqliteRecordStore, SqliteVersionStore,
};
use uuid::Uuid;

async fn service() -> EmployeeService {
    let records = Arc::new(SqliteRecordStore::in_memory().unwrap());
    let versions = Arc::new(SqliteVersionStore::in_memory().unwrap());
    EmployeeService::new(records, versions).await.unwrap()
}

fn alice() -> NewEmployee {
    NewEmployee {
        employee_id: "EMP-001".to_string(),
        full_name: "Alice Mokashi".to_string(),
        email: "alice@example.com".to_string(),
        phone: Some("555-0100".to_string()),
        department: "IT".to_string(),
        designation: "Engineer".to_string(),
        salary: 50000.0,
        status: None,
        date_of_joining: "2023-06-01T00:00:00Z".parse().unwrap(),
    }
}

fn transfer_to_finance() -> EmployeeUpdate {
    EmployeeUpdate {
        department: Some("Finance".to_string()),
        salary: Some(55000.0),
        ..Default::default()
    }
}

#[tokio::test]
async fn create_yields_entry_with_empty_changes() {
    let service = service().await;
    let record = service.create(alice(), "admin", None).await.unwrap();

    let page = service.history(record.id, 1, 20).await.unwrap();
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.history[0].operation, Operation::Create);
    assert!(page.history[0].changes.is_empty());
    assert_eq!(page.history[0].changed_by, "admin");
    assert_eq!(page.employee.full_name, "Alice Mokashi");
}

#[tokio::test]
async fn update_records_ordered_field_changes() {
    let service = service().await;
    let record = service.create(alice(), "admin", None).await.unwrap();

    service
        .update(record.id, transfer_to_finance(), "hr", Some("Transfer"))
        .await
        .unwrap();

    let page = service.history(record.id, 1, 20).await.unwrap();
    assert_eq!(page.pagination.total, 2);

    // Newest first: the update precedes the create in the listing.
    let update = &page.history[0];
    assert_eq!(update.operation, Operation::Update);
    assert_eq!(update.changed_by, "hr");
    assert_eq!(update.change_reason.as_deref(), Some("Transfer"));

    // Field order follows the trackable field table: department, then salary.
    assert_eq!(update.changes.len(), 2);
    assert_eq!(update.changes[0].field, "department");
    assert_eq!(update.changes[0].old_value, Some("IT".into()));
    assert_eq!(update.changes[0].new_value, Some("Finance".into()));
    assert_eq!(update.changes[1].field, "salary");
    assert_eq!(update.changes[1].old_value, Some(FieldValue::Number(50000.0)));
    assert_eq!(update.changes[1].new_value, Some(FieldValue::Number(55000.0)));

    assert_eq!(page.history[1].operation, Operation::Create);
}

#[tokio::test]
async fn no_op_update_records_empty_change_set() {
    let service = service().await;
    let record = service.create(alice(), "admin", None).await.unwrap();

    service
        .update(record.id, EmployeeUpdate::default(), "admin", None)
        .await
        .unwrap();

    let page = service.history(record.id, 1, 20).await.unwrap();
    let update = &page.history[0];
    assert_eq!(update.operation, Operation::Update);
    assert!(update.changes.is_empty());
}

#[tokio::test]
async fn mirror_updates_have_swapped_change_sets() {
    let service = service().await;
    let record = service.create(alice(), "admin", None).await.unwrap();

    service
        .update(record.id, transfer_to_finance(), "admin", None)
        .await
        .unwrap();
    service
        .update(
            record.id,
            EmployeeUpdate {
                department: Some("IT".to_string()),
                salary: Some(50000.0),
                ..Default::default()
            },
            "admin",
            None,
        )
        .await
        .unwrap();

    let page = service.history(record.id, 1, 20).await.unwrap();
    let back = &page.history[0];
    let forth = &page.history[1];

    assert_eq!(forth.changes.len(), back.changes.len());
    for (f, b) in forth.changes.iter().zip(back.changes.iter()) {
        assert_eq!(f.field, b.field);
        assert_eq!(f.old_value, b.new_value);
        assert_eq!(f.new_value, b.old_value);
    }
}

#[tokio::test]
async fn listing_is_newest_first_and_stable() {
    let service = service().await;
    let record = service.create(alice(), "admin", None).await.unwrap();
    for i in 0..5u32 {
        service
            .update(
                record.id,
                EmployeeUpdate {
                    salary: Some(50000.0 + f64::from(i + 1)),
                    ..Default::default()
                },
                "admin",
                None,
            )
            .await
            .unwrap();
    }

    let page = service.history(record.id, 1, 20).await.unwrap();
    assert_eq!(page.pagination.total, 6);

    // Strictly non-increasing timestamps, strictly decreasing sequence.
    for pair in page.history.windows(2) {
        assert!(pair[0].timestamp >= pair[1].timestamp);
        assert!(pair[0].sequence > pair[1].sequence);
    }

    // Same call, same result, absent new writes.
    let again = service.history(record.id, 1, 20).await.unwrap();
    let ids: Vec<Uuid> = page.history.iter().map(|e| e.id).collect();
    let ids_again: Vec<Uuid> = again.history.iter().map(|e| e.id).collect();
    assert_eq!(ids, ids_again);
}

#[tokio::test]
async fn pagination_covers_all_entries_exactly_once() {
    let service = service().await;
    let record = service.create(alice(), "admin", None).await.unwrap();
    for i in 0..6u32 {
        service
            .update(
                record.id,
                EmployeeUpdate {
                    salary: Some(50000.0 + f64::from(i + 1)),
                    ..Default::default()
                },
                "admin",
                None,
            )
            .await
            .unwrap();
    }

    let mut seen = Vec::new();
    let mut page_no = 1;
    loop {
        let page = service.history(record.id, page_no, 3).await.unwrap();
        assert_eq!(page.pagination.total, 7);
        assert_eq!(page.pagination.total_pages, 3);
        if page.history.is_empty() {
            break;
        }
        seen.extend(page.history.iter().map(|e| e.id));
        page_no += 1;
    }

    assert_eq!(seen.len(), 7);
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 7, "entries must appear exactly once across pages");
}

#[tokio::test]
async fn page_beyond_the_end_is_empty_not_an_error() {
    let service = service().await;
    let record = service.create(alice(), "admin", None).await.unwrap();

    let page = service.history(record.id, 2, 1).await.unwrap();
    assert!(page.history.is_empty());
    assert_eq!(page.pagination.page, 2);
    assert_eq!(page.pagination.limit, 1);
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.pagination.total_pages, 1);
}

#[tokio::test]
async fn delete_records_entry_and_history_survives() {
    let service = service().await;
    let record = service.create(alice(), "admin", None).await.unwrap();
    service
        .delete(record.id, "admin", Some("Left the company"))
        .await
        .unwrap();

    let page = service.history(record.id, 1, 20).await.unwrap();
    assert_eq!(page.pagination.total, 2);
    assert_eq!(page.history[0].operation, Operation::Delete);
    assert!(page.history[0].changes.is_empty());
    assert_eq!(
        page.history[0].change_reason.as_deref(),
        Some("Left the company")
    );
}

#[tokio::test]
async fn compare_returns_both_versions() {
    let service = service().await;
    let record = service.create(alice(), "admin", None).await.unwrap();
    service
        .update(record.id, transfer_to_finance(), "admin", None)
        .await
        .unwrap();

    let page = service.history(record.id, 1, 20).await.unwrap();
    let update_id = page.history[0].id;
    let create_id = page.history[1].id;

    let comparison = service
        .compare(record.id, create_id, update_id)
        .await
        .unwrap();
    assert_eq!(comparison.version1.operation, Operation::Create);
    assert_eq!(comparison.version2.operation, Operation::Update);
    assert_eq!(comparison.version2.changes.len(), 2);
}

#[tokio::test]
async fn compare_rejects_foreign_version_ids() {
    let service = service().await;
    let record = service.create(alice(), "admin", None).await.unwrap();
    let mut other = alice();
    other.employee_id = "EMP-002".to_string();
    other.email = "bob@example.com".to_string();
    let other = service.create(other, "admin", None).await.unwrap();

    let page = service.history(record.id, 1, 20).await.unwrap();
    let own_id = page.history[0].id;
    let foreign_id = service.history(other.id, 1, 20).await.unwrap().history[0].id;

    // A version id belonging to another record is not found here.
    let err = service
        .compare(record.id, own_id, foreign_id)
        .await
        .unwrap_err();
    assert!(matches!(err, RosterError::VersionNotFound { .. }));

    let err = service
        .compare(record.id, Uuid::new_v4(), own_id)
        .await
        .unwrap_err();
    assert!(matches!(err, RosterError::VersionNotFound { .. }));
}

#[tokio::test]
async fn history_for_unknown_record_is_not_found() {
    let service = service().await;
    let err = service.history(Uuid::new_v4(), 1, 20).await.unwrap_err();
    assert!(matches!(err, RosterError::NotFound { .. }));
}
