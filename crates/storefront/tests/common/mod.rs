//! In-memory commerce API fake shared by the scenario tests.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use lotus_threads_core::{
    Address, AddressForm, AddressId, CartItem, Order, OrderId, OrderIntent, PaymentSession,
    PaymentStatus, Price, Product, ProductId, ShippingMethod, UserId, WishlistItem,
};
use lotus_threads_storefront::api::{ApiError, CommerceApi};

/// One scripted answer for a payment status check.
#[derive(Debug, Clone, Copy)]
pub enum StatusStep {
    Ok(PaymentStatus),
    /// A transient failure (HTTP 500); the poller should keep going.
    Retryable,
    /// A terminal failure (401); the poller should give up.
    Fatal,
}

#[derive(Default)]
struct State {
    products: HashMap<ProductId, Product>,
    cart: Vec<CartItem>,
    wishlist: Vec<WishlistItem>,
    addresses: Vec<Address>,
    status_script: VecDeque<StatusStep>,
    reject_next_order: Option<String>,
}

/// In-memory stand-in for the remote commerce API.
///
/// Call counters let tests assert how often the network would have been
/// hit; the status script drives the payment polling scenarios.
#[derive(Default)]
pub struct FakeCommerce {
    state: Mutex<State>,
    pub fetch_cart_calls: AtomicU32,
    pub fetch_wishlist_calls: AtomicU32,
    pub create_order_calls: AtomicU32,
    pub create_session_calls: AtomicU32,
    pub status_calls: AtomicU32,
}

impl FakeCommerce {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let fake = Self::new();
        {
            let mut state = fake.lock();
            for product in products {
                state.products.insert(product.id.clone(), product);
            }
        }
        fake
    }

    /// Queue answers for successive `payment_status` calls. Once the
    /// script runs dry every further check reports `Pending`.
    pub fn script_statuses(&self, steps: impl IntoIterator<Item = StatusStep>) {
        self.lock().status_script.extend(steps);
    }

    /// Make the next `create_order` fail with a 400 and this message.
    pub fn reject_next_order(&self, message: &str) {
        self.lock().reject_next_order = Some(message.to_string());
    }

    pub fn cart_snapshot(&self) -> Vec<CartItem> {
        self.lock().cart.clone()
    }

    pub fn wishlist_snapshot(&self) -> Vec<WishlistItem> {
        self.lock().wishlist.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl CommerceApi for FakeCommerce {
    async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.lock()
            .products
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("products/{id}")))
    }

    async fn fetch_cart(&self) -> Result<Vec<CartItem>, ApiError> {
        self.fetch_cart_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.lock().cart.clone())
    }

    async fn cart_add(&self, product_id: &ProductId, quantity: u32) -> Result<(), ApiError> {
        let mut state = self.lock();
        let product = state
            .products
            .get(product_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("products/{product_id}")))?;
        let existing = state
            .cart
            .iter()
            .find(|line| &line.product_id == product_id)
            .map_or(0, |line| line.quantity);
        if existing + quantity > product.stock {
            return Err(ApiError::BadRequest("Insufficient stock".to_string()));
        }
        match state
            .cart
            .iter_mut()
            .find(|line| &line.product_id == product_id)
        {
            Some(line) => *line = line.clone().with_quantity(existing + quantity),
            None => state.cart.push(CartItem::from_product(&product, quantity)),
        }
        Ok(())
    }

    async fn cart_update(&self, product_id: &ProductId, quantity: u32) -> Result<(), ApiError> {
        let mut state = self.lock();
        let stock = state
            .products
            .get(product_id)
            .map_or(0, |product| product.stock);
        if quantity > stock {
            return Err(ApiError::BadRequest("Insufficient stock".to_string()));
        }
        match state
            .cart
            .iter_mut()
            .find(|line| &line.product_id == product_id)
        {
            Some(line) => {
                *line = line.clone().with_quantity(quantity);
                Ok(())
            }
            None => Err(ApiError::BadRequest("Product not in cart".to_string())),
        }
    }

    async fn cart_remove(&self, product_id: &ProductId) -> Result<(), ApiError> {
        self.lock()
            .cart
            .retain(|line| &line.product_id != product_id);
        Ok(())
    }

    async fn cart_clear(&self) -> Result<(), ApiError> {
        self.lock().cart.clear();
        Ok(())
    }

    async fn fetch_wishlist(&self) -> Result<Vec<WishlistItem>, ApiError> {
        self.fetch_wishlist_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.lock().wishlist.clone())
    }

    async fn wishlist_add(&self, product_id: &ProductId) -> Result<(), ApiError> {
        let mut state = self.lock();
        let product = state
            .products
            .get(product_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("products/{product_id}")))?;
        if !state
            .wishlist
            .iter()
            .any(|item| &item.product_id == product_id)
        {
            state.wishlist.push(WishlistItem {
                id: format!("wl-{product_id}"),
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                product_slug: product.slug.clone(),
                product_images: product.images.clone(),
                product_price: product.price,
                product_discount_price: product.discount_price,
                in_stock: product.in_stock,
                created_at: Utc::now(),
            });
        }
        Ok(())
    }

    async fn wishlist_remove(&self, product_id: &ProductId) -> Result<(), ApiError> {
        self.lock()
            .wishlist
            .retain(|item| &item.product_id != product_id);
        Ok(())
    }

    async fn wishlist_clear(&self) -> Result<(), ApiError> {
        self.lock().wishlist.clear();
        Ok(())
    }

    async fn addresses(&self) -> Result<Vec<Address>, ApiError> {
        Ok(self.lock().addresses.clone())
    }

    async fn create_address(&self, form: &AddressForm) -> Result<Address, ApiError> {
        form.validate()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        let mut state = self.lock();
        let address = Address {
            id: AddressId::new(format!("addr-{}", state.addresses.len() + 1)),
            user_id: UserId::new("user-1"),
            recipient_name: form.recipient_name.clone(),
            phone_number: form.phone_number.clone(),
            address_line1: form.address_line1.clone(),
            address_line2: form.address_line2.clone(),
            ward: form.ward.clone(),
            district: form.district.clone(),
            province_city: form.province_city.clone(),
            postal_code: form.postal_code.clone(),
            is_default: form.is_default,
        };
        state.addresses.push(address.clone());
        Ok(address)
    }

    async fn set_default_address(&self, id: &AddressId) -> Result<Address, ApiError> {
        let mut state = self.lock();
        if !state.addresses.iter().any(|address| &address.id == id) {
            return Err(ApiError::NotFound(format!("addresses/{id}")));
        }
        for address in &mut state.addresses {
            address.is_default = &address.id == id;
        }
        state
            .addresses
            .iter()
            .find(|address| &address.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("addresses/{id}")))
    }

    async fn create_order(&self, intent: &OrderIntent) -> Result<Order, ApiError> {
        self.create_order_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.lock();
        if let Some(message) = state.reject_next_order.take() {
            return Err(ApiError::BadRequest(message));
        }
        let mut sub_total = Price::ZERO;
        for line in &intent.items {
            let product = state
                .products
                .get(&line.product_id)
                .ok_or_else(|| ApiError::NotFound(format!("products/{}", line.product_id)))?;
            sub_total = sub_total + product.effective_price().times(line.quantity);
        }
        let shipping_fee = intent.shipping_method.fee();
        Ok(Order {
            id: OrderId::new("ord-1"),
            status: "PENDING".to_string(),
            payment_method: intent.payment_method,
            shipping_method: intent.shipping_method,
            sub_total,
            shipping_fee,
            total: sub_total + shipping_fee,
            created_at: Utc::now(),
        })
    }

    async fn create_payment_session(
        &self,
        order_id: &OrderId,
    ) -> Result<PaymentSession, ApiError> {
        self.create_session_calls.fetch_add(1, Ordering::SeqCst);
        Ok(PaymentSession {
            order_id: order_id.clone(),
            payment_url: format!("https://pay.example/qr/{order_id}"),
            status: PaymentStatus::Pending,
        })
    }

    async fn payment_status(&self, _order_id: &OrderId) -> Result<PaymentStatus, ApiError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        match self.lock().status_script.pop_front() {
            Some(StatusStep::Ok(status)) => Ok(status),
            Some(StatusStep::Retryable) => Err(ApiError::Server(500)),
            Some(StatusStep::Fatal) => Err(ApiError::Unauthorized),
            None => Ok(PaymentStatus::Pending),
        }
    }
}

/// Catalog product with the given list price and stock.
pub fn product(id: &str, price: i64, stock: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        slug: id.to_string(),
        description: String::new(),
        price: Price::from_dong(price),
        discount_price: None,
        stock,
        images: vec![format!("{id}.jpg")],
        featured: false,
        category_id: "cat-1".into(),
        category_name: "Áo".to_string(),
        category_slug: "ao".to_string(),
        in_stock: stock > 0,
        on_sale: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// A complete, valid address form.
pub fn address_form() -> AddressForm {
    AddressForm {
        recipient_name: "Nguyễn Văn A".to_string(),
        phone_number: "0912345678".to_string(),
        address_line1: "123 Đường Lê Lợi".to_string(),
        ward: "Phường Bến Nghé".to_string(),
        district: "Quận 1".to_string(),
        province_city: "TP Hồ Chí Minh".to_string(),
        ..AddressForm::default()
    }
}

/// A session provider with an established session.
pub fn signed_in() -> std::sync::Arc<lotus_threads_storefront::session::SessionProvider> {
    use lotus_threads_storefront::session::{Session, SessionProvider};
    use secrecy::SecretString;

    let provider = SessionProvider::new();
    provider.establish(Session {
        user_id: UserId::new("user-1"),
        email: "a@example.com".to_string(),
        display_name: "Nguyễn Văn A".to_string(),
        access_token: SecretString::from("access-token"),
        refresh_token: SecretString::from("refresh-token"),
    });
    std::sync::Arc::new(provider)
}
