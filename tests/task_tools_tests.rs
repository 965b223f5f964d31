//! Task lifecycle tool tests
mod common;

use common::*;

#[tokio::test]
async fn test_add_task_with_defaults() {
    let (handler, _temp) = get_test_handler();

    let response = handler
        .handle_add_task(
            "  ".to_string(),
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            None,
        )
        .await
        .unwrap();

    assert!(response.contains("task-1 New task (priority: medium)"));
    assert!(!response.contains("Due:"));
}

#[tokio::test]
async fn test_add_task_with_all_fields() {
    let (handler, _temp) = get_test_handler();

    let response = handler
        .handle_add_task(
            "Pay rent".to_string(),
            Some("pay-rent".to_string()),
            Some("Bank transfer".to_string()),
            Some("2026-10-20 09:30".to_string()),
            Some("1".to_string()),
            Some("Home, money, home".to_string()),
            Some("weekly".to_string()),
            Some("monthly".to_string()),
            None,
            Some(30),
        )
        .await
        .unwrap();

    assert!(response.contains("pay-rent Pay rent (priority: high)"));
    assert!(response.contains("Due: 2026-10-20 09:30"));
    assert!(response.contains("Tags: #home #money"));
    assert!(response.contains("List: weekly"));
    assert!(response.contains("Repeat: monthly"));
    assert!(response.contains("Reminder: 30 min before"));
    assert!(response.contains("Notes: Bank transfer"));
}

#[tokio::test]
async fn test_add_task_rejects_duplicate_id() {
    let (handler, _temp) = get_test_handler();
    let id = add_simple_task(&handler, "First").await;

    let result = handler
        .handle_add_task(
            "Second".to_string(),
            Some(id),
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            None,
        )
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_add_task_rejects_invalid_arguments() {
    let (handler, _temp) = get_test_handler();

    let bad_due = handler
        .handle_add_task(
            "A".to_string(),
            None,
            None,
            Some("next friday".to_string()),
            None,
            None,
            None,
            None,
            None,
            None,
        )
        .await;
    assert!(bad_due.is_err());

    let bad_priority = handler
        .handle_add_task(
            "A".to_string(),
            None,
            None,
            None,
            Some("asap".to_string()),
            None,
            None,
            None,
            None,
            None,
        )
        .await;
    assert!(bad_priority.is_err());

    let bad_repeat = handler
        .handle_add_task(
            "A".to_string(),
            None,
            None,
            None,
            None,
            None,
            None,
            Some("yearly".to_string()),
            None,
            None,
        )
        .await;
    assert!(bad_repeat.is_err());

    let list = handler
        .handle_list(None, None, None, None, None)
        .await
        .unwrap();
    assert!(list.contains("No tasks yet"));
}

#[tokio::test]
async fn test_rule_without_repeat_means_custom() {
    let (handler, _temp) = get_test_handler();

    let response = handler
        .handle_add_task(
            "Review".to_string(),
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            Some("FREQ=WEEKLY;INTERVAL=2".to_string()),
            None,
        )
        .await
        .unwrap();

    assert!(response.contains("Repeat: custom (FREQ=WEEKLY;INTERVAL=2)"));
}

#[tokio::test]
async fn test_update_task_edits_and_clears() {
    let (handler, _temp) = get_test_handler();
    let id = add_simple_task(&handler, "Draft report").await;

    let response = handler
        .handle_update_task(
            id.clone(),
            Some("Final report".to_string()),
            None,
            Some("2026-10-21".to_string()),
            Some("low".to_string()),
            Some("Work".to_string()),
            Some("daily".to_string()),
            None,
            None,
            Some(true),
            Some(5),
        )
        .await
        .unwrap();
    assert!(response.contains("Final report (priority: low)"));
    assert!(response.contains("Due: 2026-10-21 00:00"));
    assert!(response.contains("Tags: #work"));
    assert!(response.contains("List: daily"));
    assert!(response.contains("Reminder: 5 min before"));

    let response = handler
        .handle_update_task(
            id,
            Some("".to_string()),
            None,
            Some("".to_string()),
            None,
            None,
            Some("none".to_string()),
            None,
            None,
            None,
            None,
        )
        .await
        .unwrap();
    assert!(response.contains("Untitled"));
    assert!(!response.contains("Due:"));
    assert!(!response.contains("List:"));
    assert!(response.contains("Tags: #work"));
}

#[tokio::test]
async fn test_update_missing_task() {
    let (handler, _temp) = get_test_handler();

    let result = handler
        .handle_update_task(
            "nope".to_string(),
            Some("x".to_string()),
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            None,
        )
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_complete_weekly_task_spawns_next_occurrence() {
    let (handler, _temp) = get_test_handler();
    handler
        .handle_add_task(
            "Water plants".to_string(),
            Some("plants".to_string()),
            None,
            Some("2026-10-19 18:00".to_string()),
            None,
            None,
            None,
            Some("weekly".to_string()),
            None,
            None,
        )
        .await
        .unwrap();

    let response = handler
        .handle_complete_task("plants".to_string(), None)
        .await
        .unwrap();
    assert!(response.contains("Task plants completed at 2026-10-19 09:00"));
    assert!(response.contains("Next occurrence created: task-1 due 2026-10-26 18:00"));

    let list = handler
        .handle_list(None, None, None, None, None)
        .await
        .unwrap();
    assert!(list.contains("Found 2 task(s)"));
    assert!(list.contains("- [x] plants Water plants"));
    assert!(list.contains("- [ ] task-1 Water plants"));
}

#[tokio::test]
async fn test_reopen_task() {
    let (handler, _temp) = get_test_handler();
    let id = add_simple_task(&handler, "Call mom").await;

    handler
        .handle_complete_task(id.clone(), Some(true))
        .await
        .unwrap();
    let response = handler
        .handle_complete_task(id.clone(), Some(false))
        .await
        .unwrap();

    assert_eq!(response, format!("Task {} reopened", id));
}

#[tokio::test]
async fn test_delete_task() {
    let (handler, _temp) = get_test_handler();
    let id = add_simple_task(&handler, "Obsolete").await;

    let response = handler.handle_delete_task(id.clone()).await.unwrap();
    assert!(response.contains("deleted: Obsolete"));

    assert!(handler.handle_delete_task(id).await.is_err());
}

#[tokio::test]
async fn test_subtask_tools() {
    let (handler, _temp) = get_test_handler();
    let id = add_simple_task(&handler, "Groceries").await;

    let added = handler
        .handle_add_subtask(id.clone(), "Milk".to_string())
        .await
        .unwrap();
    assert!(added.contains("Subtask sub-2 added"));

    let updated = handler
        .handle_update_subtask(
            id.clone(),
            "sub-2".to_string(),
            Some(true),
            Some("Oat milk".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(updated, "Subtask sub-2 updated: [x] Oat milk");

    assert!(
        handler
            .handle_update_subtask(id.clone(), "sub-2".to_string(), None, None)
            .await
            .is_err()
    );
    assert!(
        handler
            .handle_update_subtask(id.clone(), "sub-9".to_string(), Some(true), None)
            .await
            .is_err()
    );
    assert!(
        handler
            .handle_add_subtask(id.clone(), "   ".to_string())
            .await
            .is_err()
    );

    handler
        .handle_delete_subtask(id.clone(), "sub-2".to_string())
        .await
        .unwrap();
    let list = handler
        .handle_list(None, None, None, None, None)
        .await
        .unwrap();
    assert!(!list.contains("Oat milk"));
}
