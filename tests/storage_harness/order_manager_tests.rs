//! Macro-generated test suite for the Order Record Manager over a backend.
//!
//! # Usage
//!
//! ```rust,ignore
//! order_manager_tests!(
//!     InMemoryDataService::<Order>::new(),
//!     InMemoryDataService::<User>::new(),
//!     InMemoryDataService::<Product>::new()
//! );
//! ```
//!
//! Each factory must yield an empty store; the fixture seeds one user and
//! two products.

#[macro_export]
macro_rules! order_manager_tests {
    ($orders:expr, $users:expr, $products:expr) => {
        mod order_manager_contract_tests {
            use super::*;
            use storefront::config::OrderPolicy;
            use storefront::core::error::{
                EntityError, ShopError, TransitionError, ValidationError,
            };
            use storefront::core::order::OrderStatus;
            use uuid::Uuid;

            async fn fixture() -> ManagerFixture {
                manager_fixture($orders, $users, $products, strict_policy()).await
            }

            async fn fixture_with(policy: OrderPolicy) -> ManagerFixture {
                manager_fixture($orders, $users, $products, policy).await
            }

            fn assert_not_found(err: ShopError, expected_type: &str, expected_id: Uuid) {
                match err {
                    ShopError::Entity(EntityError::NotFound { entity_type, id }) => {
                        assert_eq!(entity_type, expected_type);
                        assert_eq!(id, expected_id.to_string());
                    }
                    other => panic!("expected not found, got {:?}", other),
                }
            }

            // ==================================================================
            // create
            // ==================================================================

            #[tokio::test]
            async fn test_create_valid_order() {
                let fx = fixture().await;
                let before = chrono::Utc::now();

                let order = fx
                    .manager
                    .create(new_order(fx.user.id, &[(fx.chips.id, 2)], 19.98))
                    .await
                    .unwrap();

                assert_eq!(order.status, OrderStatus::Pending);
                assert_eq!(order.user_id, fx.user.id);
                assert!(order.created_at >= before);
                assert_eq!(order.total_amount, 19.98);

                let fetched = fx.manager.get_by_id(&order.id).await.unwrap();
                assert_eq!(fetched, order);
            }

            #[tokio::test]
            async fn test_created_order_document_shape() {
                let fx = fixture().await;
                let order = fx
                    .manager
                    .create(new_order(fx.user.id, &[(fx.chips.id, 2)], 19.98))
                    .await
                    .unwrap();

                let value = serde_json::to_value(&order).unwrap();
                assert_eq!(value["status"], "pending");
                assert_eq!(value["products"][0]["quantity"], 2);
                assert_eq!(value["products"][0]["product"], fx.chips.id.to_string());
                assert_eq!(value["user"], fx.user.id.to_string());
            }

            #[tokio::test]
            async fn test_create_with_several_products() {
                let fx = fixture().await;
                let order = fx
                    .manager
                    .create(new_order(
                        fx.user.id,
                        &[(fx.chips.id, 1), (fx.tea.id, 3)],
                        23.49,
                    ))
                    .await
                    .unwrap();

                assert_eq!(order.line_items.len(), 2);
                assert_eq!(order.item_count(), 4);
            }

            #[tokio::test]
            async fn test_zero_quantity_is_rejected() {
                let fx = fixture().await;
                let err = fx
                    .manager
                    .create(new_order(fx.user.id, &[(fx.chips.id, 0)], 0.0))
                    .await
                    .unwrap_err();

                assert!(matches!(err, ShopError::Validation(_)));
                assert_eq!(stored_order_count(&fx.orders, fx.user.id).await, 0);
            }

            #[tokio::test]
            async fn test_negative_quantity_is_rejected() {
                let fx = fixture().await;
                let err = fx
                    .manager
                    .create(new_order(fx.user.id, &[(fx.chips.id, 1), (fx.tea.id, -2)], 1.0))
                    .await
                    .unwrap_err();

                match err {
                    ShopError::Validation(ValidationError::FieldErrors(errors)) => {
                        assert_eq!(errors.len(), 1);
                        assert_eq!(errors[0].field, "products[1].quantity");
                    }
                    other => panic!("expected field errors, got {:?}", other),
                }
                assert_eq!(stored_order_count(&fx.orders, fx.user.id).await, 0);
            }

            #[tokio::test]
            async fn test_negative_total_is_rejected() {
                let fx = fixture().await;
                let err = fx
                    .manager
                    .create(new_order(fx.user.id, &[(fx.chips.id, 1)], -9.99))
                    .await
                    .unwrap_err();

                assert_eq!(err.error_code(), "VALIDATION_ERROR");
                assert_eq!(stored_order_count(&fx.orders, fx.user.id).await, 0);
            }

            #[tokio::test]
            async fn test_unknown_user_is_not_found() {
                let fx = fixture().await;
                let stranger = Uuid::new_v4();

                let err = fx
                    .manager
                    .create(new_order(stranger, &[(fx.chips.id, 1)], 9.99))
                    .await
                    .unwrap_err();

                assert_not_found(err, "user", stranger);
                assert_eq!(stored_order_count(&fx.orders, stranger).await, 0);
            }

            #[tokio::test]
            async fn test_unknown_product_is_not_found() {
                let fx = fixture().await;
                let missing = Uuid::new_v4();

                let err = fx
                    .manager
                    .create(new_order(fx.user.id, &[(fx.chips.id, 1), (missing, 1)], 9.99))
                    .await
                    .unwrap_err();

                assert_not_found(err, "product", missing);
                assert_eq!(stored_order_count(&fx.orders, fx.user.id).await, 0);
            }

            #[tokio::test]
            async fn test_validation_runs_before_lookups() {
                let fx = fixture().await;
                let err = fx
                    .manager
                    .create(new_order(Uuid::new_v4(), &[(Uuid::new_v4(), 0)], 0.0))
                    .await
                    .unwrap_err();

                assert!(matches!(err, ShopError::Validation(_)));
            }

            #[tokio::test]
            async fn test_empty_order_rejected_by_default() {
                let fx = fixture().await;
                let err = fx
                    .manager
                    .create(new_order(fx.user.id, &[], 0.0))
                    .await
                    .unwrap_err();

                assert!(matches!(err, ShopError::Validation(_)));
                assert_eq!(stored_order_count(&fx.orders, fx.user.id).await, 0);
            }

            #[tokio::test]
            async fn test_empty_order_allowed_by_policy() {
                let fx = fixture_with(OrderPolicy {
                    allow_empty_orders: true,
                    ..OrderPolicy::default()
                })
                .await;

                let order = fx
                    .manager
                    .create(new_order(fx.user.id, &[], 0.0))
                    .await
                    .unwrap();
                assert!(order.line_items.is_empty());
                assert_eq!(stored_order_count(&fx.orders, fx.user.id).await, 1);
            }

            #[tokio::test]
            async fn test_client_total_is_kept_on_mismatch() {
                let fx = fixture().await;
                let order = fx
                    .manager
                    .create(new_order(fx.user.id, &[(fx.chips.id, 2)], 5.00))
                    .await
                    .unwrap();

                assert_eq!(order.total_amount, 5.00);
            }

            // ==================================================================
            // getById / listByUser
            // ==================================================================

            #[tokio::test]
            async fn test_get_unknown_order() {
                let fx = fixture().await;
                let missing = Uuid::new_v4();
                let err = fx.manager.get_by_id(&missing).await.unwrap_err();
                assert_not_found(err, "order", missing);
            }

            #[tokio::test]
            async fn test_get_owned_hides_foreign_orders() {
                let fx = fixture().await;
                let order = fx
                    .manager
                    .create(new_order(fx.user.id, &[(fx.chips.id, 1)], 9.99))
                    .await
                    .unwrap();

                assert!(fx.manager.get_owned(&order.id, &fx.user.id).await.is_ok());
                let err = fx
                    .manager
                    .get_owned(&order.id, &Uuid::new_v4())
                    .await
                    .unwrap_err();
                assert_not_found(err, "order", order.id);
            }

            #[tokio::test]
            async fn test_list_by_user_newest_first() {
                let fx = fixture().await;
                let mut created = Vec::new();
                for quantity in 1..=3 {
                    let order = fx
                        .manager
                        .create(new_order(fx.user.id, &[(fx.tea.id, quantity)], 4.50 * quantity as f64))
                        .await
                        .unwrap();
                    created.push(order.id);
                    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                }

                let listed: Vec<Uuid> = fx
                    .manager
                    .list_by_user(&fx.user.id)
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|o| o.id)
                    .collect();

                created.reverse();
                assert_eq!(listed, created);
            }

            #[tokio::test]
            async fn test_list_by_user_without_orders() {
                let fx = fixture().await;
                let listed = fx.manager.list_by_user(&Uuid::new_v4()).await.unwrap();
                assert!(listed.is_empty());
            }

            // ==================================================================
            // updateStatus
            // ==================================================================

            #[tokio::test]
            async fn test_pending_to_paid_is_visible() {
                let fx = fixture().await;
                let order = fx
                    .manager
                    .create(new_order(fx.user.id, &[(fx.chips.id, 1)], 9.99))
                    .await
                    .unwrap();

                let updated = fx
                    .manager
                    .update_status(&order.id, OrderStatus::Paid)
                    .await
                    .unwrap();
                assert_eq!(updated.status, OrderStatus::Paid);

                let fetched = fx.manager.get_by_id(&order.id).await.unwrap();
                assert_eq!(fetched.status, OrderStatus::Paid);
                assert_eq!(fetched.created_at, order.created_at);
                assert_eq!(fetched.line_items, order.line_items);
            }

            #[tokio::test]
            async fn test_paid_to_pending_is_rejected() {
                let fx = fixture().await;
                let order = fx
                    .manager
                    .create(new_order(fx.user.id, &[(fx.chips.id, 1)], 9.99))
                    .await
                    .unwrap();
                fx.manager
                    .update_status(&order.id, OrderStatus::Paid)
                    .await
                    .unwrap();

                let err = fx
                    .manager
                    .update_status(&order.id, OrderStatus::Pending)
                    .await
                    .unwrap_err();
                assert!(matches!(
                    err,
                    ShopError::Transition(TransitionError::NotAllowed {
                        from: OrderStatus::Paid,
                        to: OrderStatus::Pending
                    })
                ));
                assert_eq!(err.status_code(), axum::http::StatusCode::CONFLICT);

                let fetched = fx.manager.get_by_id(&order.id).await.unwrap();
                assert_eq!(fetched.status, OrderStatus::Paid);
            }

            #[tokio::test]
            async fn test_full_lifecycle_then_terminal() {
                let fx = fixture().await;
                let order = fx
                    .manager
                    .create(new_order(fx.user.id, &[(fx.chips.id, 1)], 9.99))
                    .await
                    .unwrap();

                for next in [OrderStatus::Paid, OrderStatus::Shipped, OrderStatus::Delivered] {
                    fx.manager.update_status(&order.id, next).await.unwrap();
                }

                let err = fx
                    .manager
                    .update_status(&order.id, OrderStatus::Cancelled)
                    .await
                    .unwrap_err();
                assert!(matches!(err, ShopError::Transition(_)));
            }

            #[tokio::test]
            async fn test_update_unknown_order() {
                let fx = fixture().await;
                let missing = Uuid::new_v4();
                let err = fx
                    .manager
                    .update_status(&missing, OrderStatus::Paid)
                    .await
                    .unwrap_err();
                assert_not_found(err, "order", missing);
            }

            #[tokio::test]
            async fn test_concurrent_transitions_single_winner() {
                let fx = fixture().await;
                let order = fx
                    .manager
                    .create(new_order(fx.user.id, &[(fx.chips.id, 1)], 9.99))
                    .await
                    .unwrap();

                // paid -> paid is illegal, so only one of these may land
                let attempts: Vec<_> = (0..2)
                    .map(|_| {
                        let manager = fx.manager.clone();
                        let id = order.id;
                        tokio::spawn(async move { manager.update_status(&id, OrderStatus::Paid).await })
                    })
                    .collect();

                let mut results = Vec::new();
                for attempt in attempts {
                    results.push(attempt.await.unwrap());
                }

                let winners = results.iter().filter(|r| r.is_ok()).count();
                assert_eq!(winners, 1);
                for result in &results {
                    if let Err(err) = result {
                        assert!(matches!(err, ShopError::Transition(_)));
                        assert_eq!(err.status_code(), axum::http::StatusCode::CONFLICT);
                    }
                }

                let stored = fx.manager.get_by_id(&order.id).await.unwrap();
                assert_eq!(stored.status, OrderStatus::Paid);
            }
        }
    };
}
