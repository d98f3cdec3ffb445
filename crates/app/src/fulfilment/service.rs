//! Fulfilment service.

use std::sync::Arc;

use async_trait::async_trait;
use attar::{
    ids::OrderUuid,
    orders::{OrderStatus, append_note, return_note},
};
use jiff::Timestamp;
use mockall::automock;
use tracing::{info, instrument};

use crate::{
    domain::{
        inventory::{InventoryService, models::DeliveredLine},
        orders::{OrdersService, models::Order},
        payments::{PaymentRecordsService, models::ProductDetail},
    },
    fulfilment::{FulfilmentError, models::TransitionReport},
    notifications::{Notifier, models::Notification},
    partial_failure::{FailureStep, PartialFailure},
};

#[derive(Clone)]
pub struct DefaultFulfilmentService {
    orders: Arc<dyn OrdersService>,
    inventory: Arc<dyn InventoryService>,
    payments: Arc<dyn PaymentRecordsService>,
    notifier: Arc<dyn Notifier>,
}

impl DefaultFulfilmentService {
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrdersService>,
        inventory: Arc<dyn InventoryService>,
        payments: Arc<dyn PaymentRecordsService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            orders,
            inventory,
            payments,
            notifier,
        }
    }

    /// Recipient and itemised lines for the delivery email. The payment
    /// record is preferred; orders without one fall back to the guest
    /// contact columns.
    async fn delivery_notification(
        &self,
        order: &Order,
        warnings: &mut Vec<PartialFailure>,
    ) -> Option<Notification> {
        let record = match self.payments.find_by_order(order.uuid).await {
            Ok(record) => record,
            Err(error) => {
                warnings.push(PartialFailure::record(FailureStep::DeliveryEmail, &error));

                return None;
            }
        };

        let (email, name, lines) = match record {
            Some(record) => (
                record.customer_email.or_else(|| order.guest_email.clone()),
                record.customer_name.or_else(|| order.guest_name.clone()),
                record.product_details,
            ),
            None => (
                order.guest_email.clone(),
                order.guest_name.clone(),
                order
                    .items
                    .iter()
                    .map(|item| ProductDetail {
                        perfume: item.perfume,
                        name: item.perfume.to_string(),
                        quantity: item.quantity,
                        unit_price: item.price,
                    })
                    .collect(),
            ),
        };

        let Some(email) = email.filter(|email| !email.trim().is_empty()) else {
            warnings.push(PartialFailure::note(
                FailureStep::DeliveryEmail,
                "no email address for order",
            ));

            return None;
        };

        Some(Notification::delivery(order, email, name, lines))
    }

    async fn send_delivery_email(&self, order: &mut Order, warnings: &mut Vec<PartialFailure>) {
        let Some(notification) = self.delivery_notification(order, warnings).await else {
            return;
        };

        match self.notifier.send(&notification).await {
            Ok(message_id) => {
                info!(%message_id, "delivery email sent");

                match self.orders.mark_delivery_email_sent(order.uuid).await {
                    Ok(()) => order.delivery_email_sent = true,
                    Err(error) => warnings.push(PartialFailure::record(
                        FailureStep::MarkDeliveryEmailSent,
                        &error,
                    )),
                }
            }
            Err(error) => {
                warnings.push(PartialFailure::record(FailureStep::DeliveryEmail, &error));
            }
        }
    }
}

#[async_trait]
impl FulfilmentService for DefaultFulfilmentService {
    #[instrument(skip(self), fields(order_uuid = %order), err)]
    async fn transition(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<TransitionReport, FulfilmentError> {
        let change = self.orders.update_status(order, status).await?;
        let transition = change.transition;
        let mut order = change.order;

        info!(
            previous = %transition.previous,
            current = %transition.current,
            "order status updated"
        );

        let mut inventory_entries = Vec::new();
        let mut warnings = Vec::new();

        if transition.triggers_delivery() {
            let lines = order
                .items
                .iter()
                .map(|item| DeliveredLine {
                    perfume: item.perfume,
                    quantity: item.quantity,
                })
                .collect();

            match self.inventory.apply_order_delivery(order.uuid, lines).await {
                Ok(entries) => inventory_entries = entries,
                Err(error) => warnings.push(PartialFailure::record(
                    FailureStep::InventoryDecrement,
                    &error,
                )),
            }

            if !order.delivery_email_sent {
                self.send_delivery_email(&mut order, &mut warnings).await;
            }
        }

        if transition.triggers_return_note() {
            let note = return_note(Timestamp::now());

            match self.orders.append_note(order.uuid, note.clone()).await {
                Ok(()) => order.notes = Some(append_note(order.notes.as_deref(), &note)),
                Err(error) => warnings.push(PartialFailure::record(FailureStep::ReturnNote, &error)),
            }
        }

        Ok(TransitionReport {
            order,
            previous: transition.previous,
            current: transition.current,
            inventory_entries,
            warnings,
        })
    }
}

#[automock]
#[async_trait]
pub trait FulfilmentService: Send + Sync {
    /// Move an order to a new status and run the side effects of the move.
    async fn transition(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<TransitionReport, FulfilmentError>;
}

#[cfg(test)]
mod tests {
    use attar::{
        ids::{InventoryLogUuid, PerfumeUuid},
        inventory::ChangeType,
        orders::StatusTransition,
    };
    use mockall::predicate::eq;
    use testresult::TestResult;

    use crate::{
        domain::{
            inventory::{InventoryServiceError, MockInventoryService, models::InventoryLogEntry},
            orders::{
                MockOrdersService, OrdersServiceError,
                models::{OrderItem, StatusChange},
            },
            payments::{MockPaymentRecordsService, models::SuccessfulPayment},
        },
        notifications::{MockNotifier, models::NotificationKind},
    };

    use super::*;

    #[derive(Default)]
    struct Mocks {
        orders: MockOrdersService,
        inventory: MockInventoryService,
        payments: MockPaymentRecordsService,
        notifier: MockNotifier,
    }

    impl Mocks {
        fn into_service(self) -> DefaultFulfilmentService {
            DefaultFulfilmentService::new(
                Arc::new(self.orders),
                Arc::new(self.inventory),
                Arc::new(self.payments),
                Arc::new(self.notifier),
            )
        }

        fn expect_status_change(&mut self, order: Order, previous: OrderStatus) {
            let current = order.status;

            self.orders
                .expect_update_status()
                .with(eq(order.uuid), eq(current))
                .times(1)
                .return_once(move |_, _| {
                    Ok(StatusChange {
                        order,
                        transition: StatusTransition::new(previous, current),
                    })
                });
        }

        fn expect_payment_record(&mut self, order: OrderUuid, email: Option<&str>) {
            let email = email.map(ToString::to_string);

            self.payments
                .expect_find_by_order()
                .with(eq(order))
                .return_once(move |order| {
                    Ok(Some(SuccessfulPayment {
                        payment_id: "pi_1".to_string(),
                        order,
                        amount: 10_100,
                        customer_email: email,
                        customer_name: Some("Jane".to_string()),
                        delivery_address: "Building X, Dubai".to_string(),
                        product_details: Vec::new(),
                        email_sent: true,
                        created_at: Timestamp::now(),
                    }))
                });
        }
    }

    fn order(status: OrderStatus, perfume: PerfumeUuid) -> Order {
        let now = Timestamp::now();

        Order {
            uuid: OrderUuid::new(),
            payment_intent_id: "pi_1".to_string(),
            user: None,
            guest_name: Some("Jane".to_string()),
            guest_email: Some("jane@example.com".to_string()),
            guest_phone: None,
            status,
            total: 10_100,
            delivery_address: "Building X, Dubai".to_string(),
            notes: None,
            delivery_email_sent: false,
            created_at: now,
            updated_at: now,
            items: vec![OrderItem {
                perfume,
                quantity: 1,
                price: 10_000,
            }],
        }
    }

    fn log_entry(order: OrderUuid, perfume: PerfumeUuid) -> InventoryLogEntry {
        InventoryLogEntry {
            uuid: InventoryLogUuid::new(),
            perfume,
            change_type: ChangeType::OrderDelivery,
            quantity_before: 5,
            quantity_after: 4,
            quantity_change: -1,
            reason: attar::inventory::delivery_reason(order),
            order: Some(order),
            created_at: Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn delivery_decrements_stock_and_sends_email() -> TestResult {
        let perfume = PerfumeUuid::new();
        let delivered = order(OrderStatus::Delivered, perfume);
        let order_uuid = delivered.uuid;
        let mut mocks = Mocks::default();

        mocks.expect_status_change(delivered, OrderStatus::Dispatched);
        mocks.expect_payment_record(order_uuid, Some("jane@example.com"));

        mocks
            .inventory
            .expect_apply_order_delivery()
            .withf(move |order, lines| {
                *order == order_uuid
                    && lines
                        == &vec![DeliveredLine {
                            perfume,
                            quantity: 1,
                        }]
            })
            .times(1)
            .return_once(move |order, _| Ok(vec![log_entry(order, perfume)]));

        mocks
            .notifier
            .expect_send()
            .withf(|notification| {
                notification.kind == NotificationKind::Delivery
                    && notification.recipient_email == "jane@example.com"
            })
            .return_once(|_| Ok("msg_2".to_string()));

        mocks
            .orders
            .expect_mark_delivery_email_sent()
            .with(eq(order_uuid))
            .times(1)
            .return_once(|_| Ok(()));

        let report = mocks
            .into_service()
            .transition(order_uuid, OrderStatus::Delivered)
            .await?;

        assert_eq!(report.previous, OrderStatus::Dispatched);
        assert_eq!(report.inventory_entries.len(), 1);
        assert_eq!(
            report.inventory_entries.first().map(|entry| entry.quantity_change),
            Some(-1)
        );
        assert!(report.order.delivery_email_sent);
        assert!(report.warnings.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn redelivering_does_not_decrement_again() -> TestResult {
        let delivered = order(OrderStatus::Delivered, PerfumeUuid::new());
        let order_uuid = delivered.uuid;
        let mut mocks = Mocks::default();

        mocks.expect_status_change(delivered, OrderStatus::Delivered);
        mocks.inventory.expect_apply_order_delivery().never();
        mocks.notifier.expect_send().never();

        let report = mocks
            .into_service()
            .transition(order_uuid, OrderStatus::Delivered)
            .await?;

        assert!(report.inventory_entries.is_empty());
        assert!(report.warnings.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn inventory_failure_keeps_the_status_change() -> TestResult {
        let delivered = order(OrderStatus::Delivered, PerfumeUuid::new());
        let order_uuid = delivered.uuid;
        let mut mocks = Mocks::default();

        mocks.expect_status_change(delivered, OrderStatus::Processing);
        mocks.expect_payment_record(order_uuid, Some("jane@example.com"));

        mocks
            .inventory
            .expect_apply_order_delivery()
            .return_once(|_, _| Err(InventoryServiceError::InvalidReference));

        mocks
            .notifier
            .expect_send()
            .return_once(|_| Ok("msg_3".to_string()));

        mocks
            .orders
            .expect_mark_delivery_email_sent()
            .return_once(|_| Ok(()));

        let report = mocks
            .into_service()
            .transition(order_uuid, OrderStatus::Delivered)
            .await?;

        assert_eq!(report.current, OrderStatus::Delivered);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(
            report.warnings.first().map(|warning| warning.step),
            Some(FailureStep::InventoryDecrement)
        );

        Ok(())
    }

    #[tokio::test]
    async fn delivery_email_is_sent_once() -> TestResult {
        let mut delivered = order(OrderStatus::Delivered, PerfumeUuid::new());
        delivered.delivery_email_sent = true;
        let order_uuid = delivered.uuid;
        let mut mocks = Mocks::default();

        mocks.expect_status_change(delivered, OrderStatus::Returned);

        mocks
            .inventory
            .expect_apply_order_delivery()
            .return_once(|_, _| Ok(Vec::new()));

        mocks.notifier.expect_send().never();

        let report = mocks
            .into_service()
            .transition(order_uuid, OrderStatus::Delivered)
            .await?;

        assert!(report.warnings.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn missing_recipient_is_a_warning() -> TestResult {
        let mut delivered = order(OrderStatus::Delivered, PerfumeUuid::new());
        delivered.guest_email = None;
        let order_uuid = delivered.uuid;
        let mut mocks = Mocks::default();

        mocks.expect_status_change(delivered, OrderStatus::Dispatched);
        mocks.expect_payment_record(order_uuid, None);

        mocks
            .inventory
            .expect_apply_order_delivery()
            .return_once(|_, _| Ok(Vec::new()));

        mocks.notifier.expect_send().never();

        let report = mocks
            .into_service()
            .transition(order_uuid, OrderStatus::Delivered)
            .await?;

        assert_eq!(report.warnings.len(), 1);
        assert_eq!(
            report.warnings.first().map(|warning| warning.step),
            Some(FailureStep::DeliveryEmail)
        );
        assert!(!report.order.delivery_email_sent);

        Ok(())
    }

    #[tokio::test]
    async fn returning_appends_a_dated_note() -> TestResult {
        let mut returned = order(OrderStatus::Returned, PerfumeUuid::new());
        returned.notes = Some("Leave at reception".to_string());
        let order_uuid = returned.uuid;
        let mut mocks = Mocks::default();

        mocks.expect_status_change(returned, OrderStatus::Delivered);

        mocks
            .orders
            .expect_append_note()
            .withf(move |order, note| *order == order_uuid && note.starts_with("Returned on "))
            .times(1)
            .return_once(|_, _| Ok(()));

        mocks.inventory.expect_apply_order_delivery().never();

        let report = mocks
            .into_service()
            .transition(order_uuid, OrderStatus::Returned)
            .await?;

        let notes = report.order.notes.unwrap_or_default();

        assert!(notes.starts_with("Leave at reception\nReturned on "));

        Ok(())
    }

    #[tokio::test]
    async fn failed_status_write_is_an_error() {
        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_update_status()
            .return_once(|_, _| Err(OrdersServiceError::NotFound));

        let result = mocks
            .into_service()
            .transition(OrderUuid::new(), OrderStatus::Dispatched)
            .await;

        assert!(matches!(
            result,
            Err(FulfilmentError::Orders(OrdersServiceError::NotFound))
        ));
    }
}
