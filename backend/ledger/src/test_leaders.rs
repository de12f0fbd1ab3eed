use chrono::{TimeZone, Utc};

use crate::leaders::{best_clients, best_profession, DateWindow, DEFAULT_CLIENT_LIMIT};
use crate::test_utils::{dollars, insert_contract, insert_paid_job, setup};
use crate::types::{ContractStatus, Money};

fn window(start: &str, end: &str) -> DateWindow {
    DateWindow::parse(Some(start), Some(end)).unwrap()
}

fn august() -> DateWindow {
    window("2020-08-01", "2020-08-31")
}

#[tokio::test]
async fn test_best_profession_over_august() {
    let pool = setup().await;

    let top = best_profession(&pool, &august()).await.unwrap().unwrap();

    // Jobs 6, 7, 8, 12, 13, 14; jobs on terminated / new contracts are skipped.
    assert_eq!(top.profession, "Programmer");
    assert_eq!(top.earnings, dollars(2_683));
}

#[tokio::test]
async fn test_best_profession_window_is_inclusive() {
    let pool = setup().await;
    let instant = "2020-08-15T19:11:26.737Z";

    let top = best_profession(&pool, &window(instant, instant))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(top.earnings, dollars(2_562));
}

#[tokio::test]
async fn test_best_profession_empty_window_is_none() {
    let pool = setup().await;

    let top = best_profession(&pool, &window("2019-01-01", "2019-12-31"))
        .await
        .unwrap();

    assert_eq!(top, None);
}

#[tokio::test]
async fn test_reports_skip_terminated_and_new_contracts() {
    let pool = setup().await;
    // Only jobs 9 (terminated contract) and 10 (new contract) were paid on the 17th.
    let the_17th = window("2020-08-17", "2020-08-17 23:59:59");

    assert_eq!(best_profession(&pool, &the_17th).await.unwrap(), None);
    assert!(best_clients(&pool, &the_17th, DEFAULT_CLIENT_LIMIT)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_best_profession_tie_goes_to_alphabetical_first() {
    let pool = setup().await;
    let paid_at = Utc
        .with_ymd_and_hms(2021, 3, 1, 12, 0, 0)
        .unwrap()
        .timestamp_millis();
    let musician = insert_contract(&pool, ContractStatus::InProgress, 1, 5).await;
    insert_paid_job(&pool, musician, dollars(100), paid_at).await;
    let fighter = insert_contract(&pool, ContractStatus::Completed, 1, 8).await;
    insert_paid_job(&pool, fighter, dollars(100), paid_at).await;

    let top = best_profession(&pool, &window("2021-03-01", "2021-03-02"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(top.profession, "Fighter");
    assert_eq!(top.earnings, dollars(100));
}

#[tokio::test]
async fn test_best_clients_default_limit() {
    let pool = setup().await;

    let clients = best_clients(&pool, &august(), DEFAULT_CLIENT_LIMIT)
        .await
        .unwrap();

    assert_eq!(clients.len(), 2);
    assert_eq!(clients[0].id, 4);
    assert_eq!(clients[0].paid, dollars(2_020));
    assert_eq!(clients[0].full_name, "Ash Kethcum");
    assert_eq!(clients[1].id, 2);
    assert_eq!(clients[1].paid, dollars(442));
    assert_eq!(clients[1].full_name, "Mr Robot");
}

#[tokio::test]
async fn test_best_clients_larger_limit_is_sorted() {
    let pool = setup().await;

    let clients = best_clients(&pool, &august(), 5).await.unwrap();

    assert!(clients.len() <= 5);
    let ids: Vec<i64> = clients.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![4, 2, 1]);
    assert!(clients.windows(2).all(|pair| pair[0].paid >= pair[1].paid));
    assert_eq!(clients[2].paid, dollars(221));
}

#[tokio::test]
async fn test_best_clients_tie_goes_to_lower_id() {
    let pool = setup().await;
    let paid_at = Utc
        .with_ymd_and_hms(2021, 3, 1, 12, 0, 0)
        .unwrap()
        .timestamp_millis();
    let third = insert_contract(&pool, ContractStatus::InProgress, 3, 7).await;
    insert_paid_job(&pool, third, Money::from_cents(5_000), paid_at).await;
    let second = insert_contract(&pool, ContractStatus::InProgress, 2, 7).await;
    insert_paid_job(&pool, second, Money::from_cents(5_000), paid_at).await;

    let clients = best_clients(&pool, &window("2021-03-01", "2021-03-02"), 2)
        .await
        .unwrap();

    let ids: Vec<i64> = clients.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![2, 3]);
}

#[tokio::test]
async fn test_best_clients_empty_window() {
    let pool = setup().await;

    let clients = best_clients(&pool, &window("2030-01-01", "2030-12-31"), 5)
        .await
        .unwrap();

    assert!(clients.is_empty());
}
