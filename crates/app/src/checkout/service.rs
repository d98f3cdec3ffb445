//! Checkout service.

use std::sync::Arc;

use async_trait::async_trait;
use attar::{
    cart::Cart,
    ids::OrderUuid,
    money::STORE_CURRENCY,
    purchaser::Purchaser,
};
use jiff::Timestamp;
use mockall::automock;
use tracing::{info, instrument, warn};

use crate::{
    checkout::{
        CheckoutError, PersistenceError, ValidationError,
        models::{
            CheckoutConfig, PAYMENT_STATUS_UPDATED_EVENT, PaymentSession, RedirectOutcome,
            SessionRequest, VerificationResult, WebhookEvent, WebhookOutcome,
        },
    },
    domain::{
        carts::CartsService,
        catalog::{
            CatalogService,
            models::{Perfume, index_perfumes, price_map},
        },
        checkouts::{
            PendingCheckoutsService, PendingCheckoutsServiceError,
            models::{NewPendingCheckout, PendingCheckout},
        },
        orders::{OrdersService, models::NewOrder},
        payments::{
            PaymentRecordsService,
            models::{NewSuccessfulPayment, ProductDetail, SuccessfulPayment},
        },
    },
    identity::{IdentityClaim, IdentityResolver},
    notifications::{Notifier, models::Notification},
    partial_failure::{FailureStep, PartialFailure},
    payment_provider::{
        PaymentProvider, PaymentProviderError,
        models::{COMPLETED_STATUS, NewPaymentIntent},
    },
};

/// Services the checkout flow coordinates.
#[derive(Clone)]
pub struct CheckoutDependencies {
    pub identity: IdentityResolver,
    pub catalog: Arc<dyn CatalogService>,
    pub carts: Arc<dyn CartsService>,
    pub pending_checkouts: Arc<dyn PendingCheckoutsService>,
    pub orders: Arc<dyn OrdersService>,
    pub payments: Arc<dyn PaymentRecordsService>,
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub notifier: Arc<dyn Notifier>,
}

#[derive(Clone)]
pub struct DefaultCheckoutService {
    deps: CheckoutDependencies,
    config: CheckoutConfig,
}

impl DefaultCheckoutService {
    #[must_use]
    pub fn new(deps: CheckoutDependencies, config: CheckoutConfig) -> Self {
        Self { deps, config }
    }

    /// Lines to charge: the persisted cart for registered customers, the
    /// client cart re-priced from the catalog for guests.
    async fn resolve_cart(
        &self,
        purchaser: &Purchaser,
        request: SessionRequest,
    ) -> Result<Cart, CheckoutError> {
        if let Some(user) = purchaser.user() {
            let cart = self
                .deps
                .carts
                .get_cart(user)
                .await
                .map_err(PersistenceError::from)?;

            return Ok(cart.to_cart());
        }

        let mut cart = Cart::from_lines(request.lines);

        if cart.is_empty() {
            return Ok(cart);
        }

        let perfumes = self.load_perfumes(&cart).await?;

        cart.reprice(&price_map(&perfumes))
            .map_err(ValidationError::from)?;

        Ok(cart)
    }

    async fn load_perfumes(&self, cart: &Cart) -> Result<Vec<Perfume>, CheckoutError> {
        Ok(self
            .deps
            .catalog
            .get_perfumes(cart.perfumes().collect())
            .await
            .map_err(PersistenceError::from)?)
    }

    async fn load_pending(&self, intent_id: &str) -> Result<PendingCheckout, CheckoutError> {
        self.deps
            .pending_checkouts
            .get_pending_checkout(intent_id)
            .await
            .map_err(|error| match error {
                PendingCheckoutsServiceError::NotFound => {
                    PersistenceError::UnknownCheckout(intent_id.to_string())
                }
                other => PersistenceError::from(other),
            })
            .map_err(CheckoutError::from)
    }

    /// Confirmation for a payment record whose email has not gone out.
    async fn send_confirmation(
        &self,
        payment: &SuccessfulPayment,
        warnings: &mut Vec<PartialFailure>,
    ) {
        let Some(recipient_email) = payment.customer_email.clone() else {
            warnings.push(PartialFailure::note(
                FailureStep::ConfirmationEmail,
                "no email address for purchaser",
            ));

            return;
        };

        let notification = Notification::confirmation(
            payment.order,
            recipient_email,
            payment.customer_name.clone(),
            payment.product_details.clone(),
            payment.amount,
            payment.delivery_address.clone(),
        );

        match self.deps.notifier.send(&notification).await {
            Ok(message_id) => {
                info!(%message_id, "confirmation email sent");

                if let Err(error) = self
                    .deps
                    .payments
                    .mark_email_sent(&payment.payment_id)
                    .await
                {
                    warnings.push(PartialFailure::record(FailureStep::MarkEmailSent, &error));
                }
            }
            Err(error) => {
                warnings.push(PartialFailure::record(
                    FailureStep::ConfirmationEmail,
                    &error,
                ));
            }
        }
    }
}

#[async_trait]
impl CheckoutService for DefaultCheckoutService {
    #[instrument(skip_all, fields(is_guest = request.is_guest), err)]
    async fn create_session(
        &self,
        request: SessionRequest,
    ) -> Result<PaymentSession, CheckoutError> {
        let purchaser = self
            .deps
            .identity
            .resolve(IdentityClaim {
                is_guest: request.is_guest,
                claimed_user: request.claimed_user,
                authorization: request.authorization.as_deref(),
                delivery_address: &request.delivery_address,
            })
            .await?;

        let delivery_address = request.delivery_address.trim().to_string();
        let cart = self.resolve_cart(&purchaser, request).await?;

        if cart.is_empty() {
            return Err(ValidationError::EmptyCart.into());
        }

        if delivery_address.is_empty() {
            return Err(ValidationError::MissingDeliveryAddress.into());
        }

        let pricing = self
            .config
            .shipping
            .price_cart(&cart)
            .map_err(ValidationError::from)?;

        let amount = pricing.total_minor_units().map_err(ValidationError::from)?;
        let currency = STORE_CURRENCY.iso_alpha_code.to_string();

        let expires_at = Timestamp::now()
            .checked_add(self.config.session_ttl)
            .map_err(ValidationError::InvalidExpiry)?;

        let created = self
            .deps
            .payment_provider
            .create_payment_intent(NewPaymentIntent {
                amount,
                currency: currency.clone(),
                description: format!("Attar order ({} items)", pricing.total_quantity),
                success_url: self.config.redirect_url(RedirectOutcome::Success),
                cancel_url: self.config.redirect_url(RedirectOutcome::Cancel),
                failure_url: self.config.redirect_url(RedirectOutcome::Failure),
                expires_at,
                test: self.config.test_mode,
            })
            .await?;

        self.deps
            .pending_checkouts
            .create_pending_checkout(NewPendingCheckout {
                intent_id: created.id.clone(),
                purchaser: purchaser.clone(),
                lines: cart.into_lines(),
                delivery_address,
                amount,
                currency: currency.clone(),
                expires_at,
            })
            .await
            .map_err(PersistenceError::from)?;

        info!(intent_id = %created.id, amount, "payment session created");

        Ok(PaymentSession {
            intent_id: created.id,
            redirect_url: created.redirect_url,
            expires_at,
            amount,
            currency,
            purchaser,
        })
    }

    #[instrument(skip(self), err)]
    async fn verify(&self, intent_id: &str) -> Result<VerificationResult, CheckoutError> {
        if let Some(record) = self
            .deps
            .payments
            .find_by_payment_id(intent_id)
            .await
            .map_err(PersistenceError::from)?
        {
            info!(order_uuid = %record.order, "payment already recorded");

            let mut warnings = Vec::new();

            if !record.email_sent {
                self.send_confirmation(&record, &mut warnings).await;
            }

            return Ok(VerificationResult {
                order: record.order,
                created: false,
                warnings,
            });
        }

        let intent = self
            .deps
            .payment_provider
            .get_payment_intent(intent_id)
            .await?;

        if !intent.is_completed() {
            return Err(PaymentProviderError::NotCompleted {
                status: intent.status,
            }
            .into());
        }

        let pending = self.load_pending(intent_id).await?;

        if pending.is_expired(Timestamp::now()) {
            warn!("pending checkout expired before verification, provider reports completed");
        }

        let mut cart = Cart::from_lines(pending.lines.clone());
        let perfumes = self.load_perfumes(&cart).await?;

        cart.reprice(&price_map(&perfumes))
            .map_err(PersistenceError::RepricingCart)?;

        let recomputed = self
            .config
            .shipping
            .price_cart(&cart)
            .and_then(|pricing| pricing.total_minor_units())
            .map_err(PersistenceError::Repricing)?;

        if recomputed != pending.amount || recomputed != intent.amount {
            return Err(PersistenceError::AmountMismatch {
                intent_id: intent_id.to_string(),
                recomputed,
                pending: pending.amount,
                confirmed: intent.amount,
            }
            .into());
        }

        let expected_currency = STORE_CURRENCY.iso_alpha_code;

        if !pending.currency.eq_ignore_ascii_case(expected_currency)
            || !intent.currency_code.eq_ignore_ascii_case(expected_currency)
        {
            return Err(PersistenceError::CurrencyMismatch {
                intent_id: intent_id.to_string(),
                expected: expected_currency.to_string(),
                confirmed: intent.currency_code,
            }
            .into());
        }

        let placement = self
            .deps
            .orders
            .create_order_with_items(NewOrder {
                uuid: OrderUuid::new(),
                payment_intent_id: intent_id.to_string(),
                purchaser: pending.purchaser.clone(),
                lines: cart.lines().to_vec(),
                total: recomputed,
                delivery_address: pending.delivery_address.clone(),
            })
            .await
            .map_err(PersistenceError::from)?;

        let order = placement.order();

        info!(
            order_uuid = %order,
            created = placement.is_created(),
            "order materialized"
        );

        let names = index_perfumes(&perfumes);

        let product_details: Vec<ProductDetail> = cart
            .lines()
            .iter()
            .map(|line| ProductDetail {
                perfume: line.perfume,
                name: names
                    .get(&line.perfume)
                    .map_or_else(|| line.perfume.to_string(), |perfume| perfume.name.clone()),
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect();

        let payment = NewSuccessfulPayment {
            payment_id: intent_id.to_string(),
            order,
            amount: recomputed,
            customer_email: pending.purchaser.email().map(ToString::to_string),
            customer_name: pending.purchaser.name().map(ToString::to_string),
            delivery_address: pending.delivery_address.clone(),
            product_details,
        };

        let recorded = self
            .deps
            .payments
            .record_payment(payment.clone())
            .await
            .map_err(PersistenceError::from)?;

        let mut warnings = Vec::new();

        if let Err(error) = self
            .deps
            .pending_checkouts
            .complete_pending_checkout(intent_id, order)
            .await
        {
            warnings.push(PartialFailure::record(
                FailureStep::CompletePendingCheckout,
                &error,
            ));
        }

        if let Some(user) = pending.purchaser.user() {
            if let Err(error) = self.deps.carts.clear(user).await {
                warnings.push(PartialFailure::record(FailureStep::ClearCart, &error));
            }
        }

        // Keyed on the payment record, not the order: a retry after a crash
        // between the two inserts still owes the confirmation.
        if recorded {
            self.send_confirmation(&payment.into_recorded(Timestamp::now()), &mut warnings)
                .await;
        }

        Ok(VerificationResult {
            order,
            created: placement.is_created(),
            warnings,
        })
    }

    #[instrument(skip_all, fields(event = %event.event, intent_id = %event.data.id), err)]
    async fn handle_webhook(&self, event: WebhookEvent) -> Result<WebhookOutcome, CheckoutError> {
        let completed = event.event == PAYMENT_STATUS_UPDATED_EVENT
            && event.data.status.as_deref() == Some(COMPLETED_STATUS);

        if !completed {
            info!("webhook event ignored");

            return Ok(WebhookOutcome::Ignored);
        }

        self.verify(&event.data.id)
            .await
            .map(WebhookOutcome::Verified)
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Price the cart, open a payment intent and remember the checkout.
    async fn create_session(
        &self,
        request: SessionRequest,
    ) -> Result<PaymentSession, CheckoutError>;

    /// Confirm a payment with the provider and materialize its order.
    /// Verifying the same intent again returns the same order.
    async fn verify(&self, intent_id: &str) -> Result<VerificationResult, CheckoutError>;

    /// React to a provider webhook. Only completed payments are verified.
    async fn handle_webhook(&self, event: WebhookEvent) -> Result<WebhookOutcome, CheckoutError>;
}
