//! Checkout flow: `Idle → AwaitingDetails → Submitting → Success`.
//!
//! `Submitting` spans the gateway call: callers that await the gateway use
//! `begin_submit` and `complete` around it, others call `submit`.
//!
//! A rejected submission goes back to `AwaitingDetails` with the cart left
//! untouched so the customer can retry.

use chrono::NaiveDate;
use thiserror::Error;

use super::cart::{Cart, CartLine};
use super::customer::CustomerDetails;
use super::delivery::{resolve_slots, DeliveryDayConfig, TimeSlot};
use super::order::{OrderReceipt, OrderSubmission};

pub const ORDER_SUCCESS_MESSAGE: &str = "Votre commande a bien été enregistrée.";
pub const ORDER_FAILURE_FALLBACK: &str =
    "Une erreur est survenue lors de l'envoi de la commande.";

/// Where a checkout submission is persisted.
pub trait OrderGateway {
    fn create_order(&self, submission: &OrderSubmission) -> Result<OrderReceipt, GatewayError>;
}

/// Rejection reported by the gateway; the message is shown to the customer
/// when present.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .message.as_deref().unwrap_or(ORDER_FAILURE_FALLBACK))]
pub struct GatewayError {
    pub message: Option<String>,
}

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn unexplained() -> Self {
        Self { message: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutState {
    #[default]
    Idle,
    AwaitingDetails,
    Submitting,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    PickupDate,
    PickupTime,
    CartItems,
    Token,
}

impl MissingField {
    fn message(self) -> &'static str {
        match self {
            MissingField::PickupDate => "Veuillez choisir une date de retrait.",
            MissingField::PickupTime => "Veuillez choisir un créneau de retrait.",
            MissingField::CartItems => "Votre panier est vide.",
            MissingField::Token => "Veuillez valider la vérification anti-robot.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("{}", .0.message())]
    Validation(MissingField),
    #[error("{0}")]
    Persistence(String),
    #[error("time slot {0} is not available on the selected date")]
    SlotUnavailable(String),
    #[error("an order is already being submitted")]
    AlreadySubmitting,
    #[error("no order is being submitted")]
    NotSubmitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// User-visible notification raised by the checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Checkout {
    cart: Cart,
    state: CheckoutState,
    pickup_date: Option<NaiveDate>,
    available_slots: Vec<TimeSlot>,
    pickup_slot: Option<TimeSlot>,
    details: CustomerDetails,
    token: Option<String>,
    notices: Vec<Notice>,
}

impl Checkout {
    pub fn new(cart: Cart) -> Self {
        Self {
            cart,
            ..Default::default()
        }
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    pub fn pickup_date(&self) -> Option<NaiveDate> {
        self.pickup_date
    }

    pub fn pickup_slot(&self) -> Option<TimeSlot> {
        self.pickup_slot
    }

    pub fn available_slots(&self) -> &[TimeSlot] {
        &self.available_slots
    }

    /// Opens the details form.
    pub fn open(&mut self) {
        if matches!(self.state, CheckoutState::Idle | CheckoutState::Success) {
            self.state = CheckoutState::AwaitingDetails;
        }
    }

    /// Closes the details form; refused while a submission is in flight.
    pub fn close(&mut self) -> Result<(), CheckoutError> {
        if self.state == CheckoutState::Submitting {
            return Err(CheckoutError::AlreadySubmitting);
        }
        self.state = CheckoutState::Idle;
        Ok(())
    }

    /// Picks the pickup date and returns the slots bookable on it.
    ///
    /// A previously chosen slot that is not offered on the new date is
    /// dropped.
    pub fn select_date(&mut self, date: NaiveDate, week: &[DeliveryDayConfig]) -> &[TimeSlot] {
        self.pickup_date = Some(date);
        self.available_slots = resolve_slots(date, week);
        if let Some(slot) = self.pickup_slot {
            if !self.available_slots.contains(&slot) {
                self.pickup_slot = None;
            }
        }
        &self.available_slots
    }

    pub fn select_slot(&mut self, slot: TimeSlot) -> Result<(), CheckoutError> {
        if !self.available_slots.contains(&slot) {
            return Err(CheckoutError::SlotUnavailable(slot.label()));
        }
        self.pickup_slot = Some(slot);
        Ok(())
    }

    pub fn set_details(&mut self, details: CustomerDetails) {
        self.details = details;
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Drains the notifications raised since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn validate(&self) -> Result<(NaiveDate, TimeSlot, String), MissingField> {
        let date = self.pickup_date.ok_or(MissingField::PickupDate)?;
        let slot = self.pickup_slot.ok_or(MissingField::PickupTime)?;
        if self.cart.is_empty() {
            return Err(MissingField::CartItems);
        }
        let token = self
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(MissingField::Token)?;
        Ok((date, slot, token.to_string()))
    }

    fn build_submission(&self, date: NaiveDate, slot: TimeSlot, token: String) -> OrderSubmission {
        OrderSubmission {
            items: self
                .cart
                .lines()
                .iter()
                .map(CartLine::with_defaulted_quantity)
                .collect(),
            total: self.cart.total(),
            pickup_date: date.format("%Y-%m-%d").to_string(),
            pickup_time: slot.label(),
            customer: self.details.clone(),
            token,
        }
    }

    /// Validates the checkout and moves it to `Submitting`, returning the
    /// payload to hand to the order gateway.
    ///
    /// Missing inputs are rejected without leaving the current state. While a
    /// submission is in flight every further call is refused until
    /// [`Checkout::complete`] reports its outcome.
    pub fn begin_submit(&mut self) -> Result<OrderSubmission, CheckoutError> {
        if self.state == CheckoutState::Submitting {
            return Err(CheckoutError::AlreadySubmitting);
        }

        let (date, slot, token) = match self.validate() {
            Ok(valid) => valid,
            Err(field) => {
                let err = CheckoutError::Validation(field);
                self.notify(NoticeKind::Error, err.to_string());
                return Err(err);
            }
        };

        let submission = self.build_submission(date, slot, token);
        self.state = CheckoutState::Submitting;
        log::debug!(
            "Submitting order of {} line(s) for pickup on {} {}",
            submission.items.len(),
            submission.pickup_date,
            submission.pickup_time
        );
        Ok(submission)
    }

    /// Applies the gateway's answer to the in-flight submission.
    pub fn complete(
        &mut self,
        outcome: Result<OrderReceipt, GatewayError>,
    ) -> Result<OrderReceipt, CheckoutError> {
        if self.state != CheckoutState::Submitting {
            return Err(CheckoutError::NotSubmitting);
        }

        match outcome {
            Ok(receipt) => {
                self.cart.clear();
                self.state = CheckoutState::Success;
                self.notify(NoticeKind::Success, ORDER_SUCCESS_MESSAGE.to_string());
                log::info!("Order {} placed", receipt.order_id);
                Ok(receipt)
            }
            Err(e) => {
                self.state = CheckoutState::AwaitingDetails;
                let message = e.to_string();
                log::warn!("Order submission rejected: {}", message);
                self.notify(NoticeKind::Error, message.clone());
                Err(CheckoutError::Persistence(message))
            }
        }
    }

    /// Submits the order through `gateway` in one step.
    ///
    /// Missing inputs are rejected locally without calling the gateway.
    pub fn submit<G: OrderGateway + ?Sized>(
        &mut self,
        gateway: &G,
    ) -> Result<OrderReceipt, CheckoutError> {
        let submission = self.begin_submit()?;
        let outcome = gateway.create_order(&submission);
        self.complete(outcome)
    }

    fn notify(&mut self, kind: NoticeKind, message: String) {
        self.notices.push(Notice { kind, message });
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    /// Records submissions and answers with a canned result.
    struct FakeGateway {
        calls: RefCell<Vec<OrderSubmission>>,
        result: Result<OrderReceipt, GatewayError>,
    }

    impl FakeGateway {
        fn accepting() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                result: Ok(OrderReceipt {
                    order_id: 42,
                    total: dec("11.50"),
                }),
            }
        }

        fn rejecting(err: GatewayError) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                result: Err(err),
            }
        }
    }

    impl OrderGateway for FakeGateway {
        fn create_order(&self, submission: &OrderSubmission) -> Result<OrderReceipt, GatewayError> {
            self.calls.borrow_mut().push(submission.clone());
            self.result.clone()
        }
    }

    // 2024-06-04 is a Tuesday.
    fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 4).expect("valid date")
    }

    fn week() -> Vec<DeliveryDayConfig> {
        vec![DeliveryDayConfig::closed("Mardi", 2)
            .with_morning("08:00", "12:00")
            .with_afternoon("14:00", "18:00")]
    }

    fn filled_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(CartLine::new("Tomates", dec("2.50")).with_quantity(dec("3")))
            .expect("add");
        cart.add(CartLine::new("Miel", dec("4.00"))).expect("add");
        cart
    }

    fn ready_checkout(cart: Cart) -> Checkout {
        let mut checkout = Checkout::new(cart);
        checkout.open();
        let slot = checkout.select_date(tuesday(), &week())[0];
        checkout.select_slot(slot).expect("slot offered");
        checkout.set_details(CustomerDetails {
            first_name: "Jeanne".to_string(),
            last_name: "Martin".to_string(),
            email: "jeanne@example.com".to_string(),
            ..Default::default()
        });
        checkout.set_token("token-123");
        checkout
    }

    #[test]
    fn starts_idle_and_opens_for_details() {
        let mut checkout = Checkout::new(Cart::new());
        assert_eq!(checkout.state(), CheckoutState::Idle);
        checkout.open();
        assert_eq!(checkout.state(), CheckoutState::AwaitingDetails);
        checkout.close().expect("close");
        assert_eq!(checkout.state(), CheckoutState::Idle);
    }

    #[test]
    fn empty_cart_is_rejected_without_calling_gateway() {
        let gateway = FakeGateway::accepting();
        let mut checkout = ready_checkout(Cart::new());

        let err = checkout.submit(&gateway).expect_err("must be rejected");

        assert_eq!(err, CheckoutError::Validation(MissingField::CartItems));
        assert!(gateway.calls.borrow().is_empty());
        assert_eq!(checkout.state(), CheckoutState::AwaitingDetails);
        let notices = checkout.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Error);
    }

    #[test]
    fn missing_date_slot_or_token_is_rejected_locally() {
        let gateway = FakeGateway::accepting();

        let mut no_date = Checkout::new(filled_cart());
        no_date.set_token("t");
        assert_eq!(
            no_date.submit(&gateway),
            Err(CheckoutError::Validation(MissingField::PickupDate))
        );

        let mut no_slot = Checkout::new(filled_cart());
        no_slot.select_date(tuesday(), &week());
        no_slot.set_token("t");
        assert_eq!(
            no_slot.submit(&gateway),
            Err(CheckoutError::Validation(MissingField::PickupTime))
        );

        let mut blank_token = ready_checkout(filled_cart());
        blank_token.set_token("   ");
        assert_eq!(
            blank_token.submit(&gateway),
            Err(CheckoutError::Validation(MissingField::Token))
        );

        assert!(gateway.calls.borrow().is_empty());
    }

    #[test]
    fn successful_submission_clears_cart() {
        let gateway = FakeGateway::accepting();
        let mut checkout = ready_checkout(filled_cart());

        let receipt = checkout.submit(&gateway).expect("accepted");

        assert_eq!(receipt.order_id, 42);
        assert!(checkout.cart().is_empty());
        assert_eq!(checkout.state(), CheckoutState::Success);
        assert_eq!(
            checkout.take_notices(),
            vec![Notice {
                kind: NoticeKind::Success,
                message: ORDER_SUCCESS_MESSAGE.to_string()
            }]
        );
    }

    #[test]
    fn submission_carries_defaulted_quantities_total_and_iso_date() {
        let gateway = FakeGateway::accepting();
        let mut checkout = ready_checkout(filled_cart());

        checkout.submit(&gateway).expect("accepted");

        let calls = gateway.calls.borrow();
        let submission = &calls[0];
        assert_eq!(submission.total, dec("11.50"));
        assert_eq!(submission.pickup_date, "2024-06-04");
        assert_eq!(submission.pickup_time, "08:00–12:00");
        assert_eq!(submission.token, "token-123");
        assert!(submission.items.iter().all(|line| line.quantity.is_some()));
        assert_eq!(submission.items[1].quantity, Some(dec("1")));
    }

    #[test]
    fn rejected_submission_keeps_cart_and_reopens_form() {
        let gateway = FakeGateway::rejecting(GatewayError::new("Stock insuffisant"));
        let mut checkout = ready_checkout(filled_cart());
        let before = checkout.cart().snapshot();

        let err = checkout.submit(&gateway).expect_err("rejected");

        assert_eq!(err, CheckoutError::Persistence("Stock insuffisant".to_string()));
        assert_eq!(checkout.cart().snapshot(), before);
        assert_eq!(checkout.state(), CheckoutState::AwaitingDetails);
        assert_eq!(checkout.take_notices()[0].message, "Stock insuffisant");
    }

    #[test]
    fn unexplained_rejection_uses_fallback_message() {
        let gateway = FakeGateway::rejecting(GatewayError::unexplained());
        let mut checkout = ready_checkout(filled_cart());

        let err = checkout.submit(&gateway).expect_err("rejected");

        assert_eq!(err, CheckoutError::Persistence(ORDER_FAILURE_FALLBACK.to_string()));
    }

    #[test]
    fn retry_after_failure_can_succeed() {
        let mut checkout = ready_checkout(filled_cart());
        checkout
            .submit(&FakeGateway::rejecting(GatewayError::unexplained()))
            .expect_err("rejected");
        checkout
            .submit(&FakeGateway::accepting())
            .expect("accepted on retry");
        assert_eq!(checkout.state(), CheckoutState::Success);
    }

    #[test]
    fn in_flight_submission_blocks_resubmit_and_close() {
        let mut checkout = ready_checkout(filled_cart());

        let submission = checkout.begin_submit().expect("valid checkout");
        assert_eq!(checkout.state(), CheckoutState::Submitting);

        let gateway = FakeGateway::accepting();
        assert_eq!(
            checkout.submit(&gateway),
            Err(CheckoutError::AlreadySubmitting)
        );
        assert_eq!(checkout.begin_submit(), Err(CheckoutError::AlreadySubmitting));
        assert_eq!(checkout.close(), Err(CheckoutError::AlreadySubmitting));
        assert!(gateway.calls.borrow().is_empty());
        assert_eq!(checkout.cart().len(), 2);

        let receipt = checkout
            .complete(gateway.create_order(&submission))
            .expect("accepted");
        assert_eq!(receipt.order_id, 42);
        assert_eq!(checkout.state(), CheckoutState::Success);
        assert!(checkout.cart().is_empty());
    }

    #[test]
    fn completing_without_submission_is_refused() {
        let mut checkout = ready_checkout(filled_cart());

        let outcome = checkout.complete(Err(GatewayError::unexplained()));

        assert_eq!(outcome, Err(CheckoutError::NotSubmitting));
        assert_eq!(checkout.state(), CheckoutState::AwaitingDetails);
        assert!(checkout.take_notices().is_empty());
    }

    #[test]
    fn slot_not_offered_for_date_is_refused() {
        let mut checkout = Checkout::new(filled_cart());
        checkout.select_date(tuesday(), &week());
        let slot = TimeSlot::from_bounds("06:00", "07:00").expect("valid slot");
        assert_eq!(
            checkout.select_slot(slot),
            Err(CheckoutError::SlotUnavailable("06:00–07:00".to_string()))
        );
    }

    #[test]
    fn changing_to_closed_date_drops_selected_slot() {
        let mut checkout = ready_checkout(filled_cart());
        assert!(checkout.pickup_slot().is_some());

        // 2024-06-05 is a Wednesday, absent from the week.
        let wednesday = NaiveDate::from_ymd_opt(2024, 6, 5).expect("valid date");
        assert!(checkout.select_date(wednesday, &week()).is_empty());
        assert!(checkout.pickup_slot().is_none());
    }
}
