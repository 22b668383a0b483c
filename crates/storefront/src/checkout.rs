//! Checkout flow controller.
//!
//! A three-step state machine (shipping address, payment method, final
//! confirmation) that accumulates an order intent and submits it at most
//! once. Navigation is guarded: a step cannot be left until its required
//! input is present, and nothing can be edited after a successful
//! submission.
//!
//! The flow owns a snapshot of the lines being bought, taken when checkout
//! starts. The live cart keeps moving underneath; the server re-validates
//! stock and re-derives prices at submission anyway.

use thiserror::Error;
use tracing::instrument;

use lotus_threads_core::{
    AddressForm, AddressId, AddressValidationError, CartItem, Order, OrderIntent, OrderLine,
    PaymentMethod, Price, ShippingAddress, ShippingMethod,
};

use crate::api::{ApiError, CommerceApi};

/// Errors from the checkout flow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout cannot start with nothing selected.
    #[error("No items selected for checkout")]
    EmptySelection,

    /// Leaving the address step requires a shipping destination.
    #[error("Please select a shipping address")]
    NoAddress,

    /// The inline address form failed validation.
    #[error(transparent)]
    InvalidAddress(#[from] AddressValidationError),

    /// Leaving the payment step requires a payment method.
    #[error("Please select a payment method")]
    NoPaymentMethod,

    /// Submission is only valid from the confirmation step.
    #[error("Order can only be placed from the confirmation step")]
    NotAtConfirmation,

    /// The flow already produced an order; start a new checkout.
    #[error("This order has already been placed")]
    AlreadySubmitted,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The step currently presented to the buyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    Address,
    Payment,
    Confirmation,
}

/// Shipping destination selection: a saved address or a filled-in form.
#[derive(Debug, Clone)]
pub enum AddressChoice {
    Existing(AddressId),
    Inline(AddressForm),
}

/// Running totals shown at every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutTotals {
    pub sub_total: Price,
    pub shipping_fee: Price,
    pub total: Price,
}

/// What a successful submission produced.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Cash on delivery: the order is final.
    Finalized(Order),
    /// Bank QR: the order exists but needs external settlement; hand the
    /// order ID to [`crate::payment::PaymentFlow`].
    AwaitPayment(Order),
}

/// Accumulates checkout input across steps and submits the order intent.
#[derive(Debug)]
pub struct CheckoutFlow {
    selection: Vec<CartItem>,
    step: CheckoutStep,
    address: Option<AddressChoice>,
    payment_method: Option<PaymentMethod>,
    shipping_method: ShippingMethod,
    note: Option<String>,
    submitted: bool,
}

impl CheckoutFlow {
    /// Start a checkout over a snapshot of cart lines.
    ///
    /// # Errors
    ///
    /// Returns `EmptySelection` if no lines are given.
    pub fn new(selection: Vec<CartItem>) -> Result<Self, CheckoutError> {
        if selection.is_empty() {
            return Err(CheckoutError::EmptySelection);
        }
        Ok(Self {
            selection,
            step: CheckoutStep::Address,
            address: None,
            payment_method: None,
            shipping_method: ShippingMethod::default(),
            note: None,
            submitted: false,
        })
    }

    /// The lines being bought.
    #[must_use]
    pub fn selection(&self) -> &[CartItem] {
        &self.selection
    }

    /// The current step.
    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    /// The chosen shipping destination, if any.
    #[must_use]
    pub fn address(&self) -> Option<&AddressChoice> {
        self.address.as_ref()
    }

    /// The chosen payment method, if any.
    #[must_use]
    pub const fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    /// The chosen shipping tier.
    #[must_use]
    pub const fn shipping_method(&self) -> ShippingMethod {
        self.shipping_method
    }

    /// Running totals for the current selections.
    ///
    /// The shipping fee tracks the chosen tier, so the total updates live
    /// as the buyer flips between tiers.
    #[must_use]
    pub fn totals(&self) -> CheckoutTotals {
        let sub_total: Price = self.selection.iter().map(|line| line.sub_total).sum();
        let shipping_fee = self.shipping_method.fee();
        CheckoutTotals {
            sub_total,
            shipping_fee,
            total: sub_total + shipping_fee,
        }
    }

    /// Choose the shipping destination. Inline forms are validated here so
    /// the buyer cannot advance with a structurally-broken address.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAddress` for a bad inline form, or
    /// `AlreadySubmitted` after submission.
    pub fn choose_address(&mut self, choice: AddressChoice) -> Result<(), CheckoutError> {
        self.ensure_editable()?;
        if let AddressChoice::Inline(form) = &choice {
            form.validate()?;
        }
        self.address = Some(choice);
        Ok(())
    }

    /// Choose how to pay.
    ///
    /// # Errors
    ///
    /// Returns `AlreadySubmitted` after submission.
    pub fn choose_payment_method(&mut self, method: PaymentMethod) -> Result<(), CheckoutError> {
        self.ensure_editable()?;
        self.payment_method = Some(method);
        Ok(())
    }

    /// Choose the shipping tier.
    ///
    /// # Errors
    ///
    /// Returns `AlreadySubmitted` after submission.
    pub fn choose_shipping_method(&mut self, method: ShippingMethod) -> Result<(), CheckoutError> {
        self.ensure_editable()?;
        self.shipping_method = method;
        Ok(())
    }

    /// Attach a free-text note to the order.
    ///
    /// # Errors
    ///
    /// Returns `AlreadySubmitted` after submission.
    pub fn set_note(&mut self, note: impl Into<String>) -> Result<(), CheckoutError> {
        self.ensure_editable()?;
        let note = note.into();
        self.note = if note.trim().is_empty() {
            None
        } else {
            Some(note)
        };
        Ok(())
    }

    /// Advance to the next step if the current step's input is complete.
    ///
    /// # Errors
    ///
    /// Returns the step's missing-input error, or `AlreadySubmitted`.
    pub fn next(&mut self) -> Result<CheckoutStep, CheckoutError> {
        self.ensure_editable()?;
        self.step = match self.step {
            CheckoutStep::Address => {
                if self.address.is_none() {
                    return Err(CheckoutError::NoAddress);
                }
                CheckoutStep::Payment
            }
            CheckoutStep::Payment => {
                if self.payment_method.is_none() {
                    return Err(CheckoutError::NoPaymentMethod);
                }
                CheckoutStep::Confirmation
            }
            CheckoutStep::Confirmation => CheckoutStep::Confirmation,
        };
        Ok(self.step)
    }

    /// Go back one step. Earlier input is kept.
    pub fn back(&mut self) -> CheckoutStep {
        self.step = match self.step {
            CheckoutStep::Address | CheckoutStep::Payment => CheckoutStep::Address,
            CheckoutStep::Confirmation => CheckoutStep::Payment,
        };
        self.step
    }

    /// Submit the accumulated order intent.
    ///
    /// Succeeds at most once per flow: after a successful submission every
    /// further call (and every setter) returns `AlreadySubmitted`. A failed
    /// submission leaves the flow editable so the buyer can correct input
    /// and retry.
    ///
    /// # Errors
    ///
    /// Returns `NotAtConfirmation` off the final step, `AlreadySubmitted`
    /// on a repeat call, or the API error from order creation.
    #[instrument(skip_all, fields(lines = self.selection.len()))]
    pub async fn submit<C: CommerceApi>(
        &mut self,
        api: &C,
    ) -> Result<SubmitOutcome, CheckoutError> {
        self.ensure_editable()?;
        if self.step != CheckoutStep::Confirmation {
            return Err(CheckoutError::NotAtConfirmation);
        }
        let intent = self.build_intent()?;
        let payment_method = intent.payment_method;

        let order = api.create_order(&intent).await?;
        self.submitted = true;
        tracing::info!(order_id = %order.id, "order placed");

        if payment_method.requires_settlement() {
            Ok(SubmitOutcome::AwaitPayment(order))
        } else {
            Ok(SubmitOutcome::Finalized(order))
        }
    }

    fn build_intent(&self) -> Result<OrderIntent, CheckoutError> {
        let shipping_address = match self.address.clone() {
            Some(AddressChoice::Existing(address_id)) => {
                ShippingAddress::Existing { address_id }
            }
            Some(AddressChoice::Inline(address)) => ShippingAddress::Inline { address },
            None => return Err(CheckoutError::NoAddress),
        };
        let payment_method = self.payment_method.ok_or(CheckoutError::NoPaymentMethod)?;

        Ok(OrderIntent {
            items: self
                .selection
                .iter()
                .map(|line| OrderLine {
                    product_id: line.product_id.clone(),
                    quantity: line.quantity,
                })
                .collect(),
            shipping_address,
            payment_method,
            shipping_method: self.shipping_method,
            note: self.note.clone(),
        })
    }

    const fn ensure_editable(&self) -> Result<(), CheckoutError> {
        if self.submitted {
            return Err(CheckoutError::AlreadySubmitted);
        }
        Ok(())
    }
}
