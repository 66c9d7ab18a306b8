use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    client::storage::{LocalStorage, StorageResult},
    models::{CatalogProduct, Product},
};

const CART_KEY: &str = "cart";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub photo: Option<String>,
    pub quantity: u32,
}

impl CartItem {
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            photo: product.photo.clone(),
            quantity,
        }
    }

    pub fn from_catalog(product: &CatalogProduct, quantity: u32) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            photo: product.photo.clone(),
            quantity,
        }
    }

    pub fn amount(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone)]
pub enum CartAction {
    Add(CartItem),
    Remove(Uuid),
    Clear,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    pub items: Vec<CartItem>,
    pub total_quantity: u64,
    pub total_amount: Decimal,
}

impl CartState {
    /// Adding zero of something is a no-op; a line's quantity saturates at `u32::MAX`.
    pub fn reduce(&mut self, action: CartAction) {
        match action {
            CartAction::Add(item) if item.quantity == 0 => {}
            CartAction::Add(item) => {
                match self.items.iter_mut().find(|line| line.id == item.id) {
                    Some(line) => line.quantity = line.quantity.saturating_add(item.quantity),
                    None => self.items.push(item),
                }
                self.recompute();
            }
            CartAction::Remove(id) => {
                self.items.retain(|line| line.id != id);
                self.recompute();
            }
            CartAction::Clear => *self = CartState::default(),
        }
    }

    pub fn line(&self, id: Uuid) -> Option<&CartItem> {
        self.items.iter().find(|line| line.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn recompute(&mut self) {
        self.total_quantity = self.items.iter().map(|line| u64::from(line.quantity)).sum();
        self.total_amount = self.items.iter().map(CartItem::amount).sum();
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedCart {
    #[serde(default)]
    context: Option<Uuid>,
    #[serde(default)]
    cart: CartState,
}

/// A cart that writes itself to local storage after every transition.
///
/// The cart also remembers the admin context it was filled under (the
/// `userId` the catalog is filtered by); switching to another context empties it.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    state: CartState,
    context: Option<Uuid>,
}

impl<S: LocalStorage> CartStore<S> {
    /// Restore the persisted cart. Totals are recomputed rather than trusted.
    pub fn open(storage: S) -> StorageResult<Self> {
        let persisted = match storage.get_item(CART_KEY)? {
            Some(raw) => serde_json::from_str::<PersistedCart>(&raw)?,
            None => PersistedCart::default(),
        };
        let mut state = persisted.cart;
        state.items.retain(|line| line.quantity > 0);
        state.recompute();
        Ok(Self {
            storage,
            state,
            context: persisted.context,
        })
    }

    pub fn state(&self) -> &CartState {
        &self.state
    }

    pub fn context(&self) -> Option<Uuid> {
        self.context
    }

    pub fn dispatch(&mut self, action: CartAction) -> StorageResult<&CartState> {
        self.state.reduce(action);
        self.persist()?;
        Ok(&self.state)
    }

    /// Hand back what was in the cart and leave it empty.
    pub fn checkout(&mut self) -> StorageResult<CartState> {
        let ordered = std::mem::take(&mut self.state);
        self.persist()?;
        tracing::debug!(lines = ordered.items.len(), total = %ordered.total_amount, "cart checked out");
        Ok(ordered)
    }

    /// Returns whether the cart was cleared.
    pub fn switch_context(&mut self, context: Option<Uuid>) -> StorageResult<bool> {
        if self.context == context {
            return Ok(false);
        }
        self.context = context;
        self.state.reduce(CartAction::Clear);
        self.persist()?;
        Ok(true)
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) -> StorageResult<()> {
        let snapshot = PersistedCart {
            context: self.context,
            cart: self.state.clone(),
        };
        let raw = serde_json::to_string(&snapshot)?;
        self.storage.set_item(CART_KEY, &raw)
    }
}
