use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::CartEntry;

/// One session's cart. Lives only in process memory; an order placement
/// persists a snapshot of the entries, never the cart itself.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Merge a snapshot entry into the cart. Repeated adds of the same item
    /// accumulate into a single entry.
    pub fn add(&mut self, entry: CartEntry) {
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|e| e.item_id == entry.item_id)
        {
            existing.quantity += entry.quantity;
        } else {
            self.entries.push(entry);
        }
    }

    /// Apply a batch of quantity changes. A positive quantity replaces the
    /// entry's quantity; zero or negative removes the entry. Every removal
    /// in the batch is applied, not just the first one.
    pub fn update(&mut self, quantities: &HashMap<Uuid, i32>) {
        for entry in &mut self.entries {
            if let Some(&quantity) = quantities.get(&entry.item_id) {
                entry.quantity = quantity;
            }
        }
        self.entries.retain(|e| e.quantity > 0);
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(CartEntry::subtotal).sum()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<CartEntry> {
        self.entries
    }
}

/// In-process cart storage keyed by the caller's session id. Concurrent
/// requests for the same session are last-writer-wins.
#[derive(Debug, Default, Clone)]
pub struct CartStore {
    inner: Arc<RwLock<HashMap<String, Cart>>>,
}

impl CartStore {
    pub async fn snapshot(&self, session: &str) -> Cart {
        self.inner
            .read()
            .await
            .get(session)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn with<F, R>(&self, session: &str, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut carts = self.inner.write().await;
        let cart = carts.entry(session.to_string()).or_default();
        let result = f(cart);
        if cart.is_empty() {
            carts.remove(session);
        }
        result
    }

    pub async fn clear(&self, session: &str) {
        self.inner.write().await.remove(session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: Uuid, price: f64, quantity: i32) -> CartEntry {
        CartEntry {
            item_id: id,
            name: "Couscous".into(),
            price,
            quantity,
            image: None,
        }
    }

    #[test]
    fn repeated_adds_merge_into_one_entry() {
        let id = Uuid::new_v4();
        let mut cart = Cart::default();
        cart.add(entry(id, 45.0, 2));
        cart.add(entry(id, 45.0, 1));

        assert_eq!(cart.entries().len(), 1);
        assert_eq!(cart.entries()[0].quantity, 3);
        assert_eq!(cart.total(), 135.0);
    }

    #[test]
    fn update_sets_and_removes_in_one_pass() {
        let keep = Uuid::new_v4();
        let drop_a = Uuid::new_v4();
        let drop_b = Uuid::new_v4();

        let mut cart = Cart::default();
        cart.add(entry(keep, 10.0, 1));
        cart.add(entry(drop_a, 20.0, 2));
        cart.add(entry(drop_b, 30.0, 3));

        let quantities = HashMap::from([(keep, 5), (drop_a, 0), (drop_b, -1)]);
        cart.update(&quantities);

        assert_eq!(cart.entries().len(), 1);
        assert_eq!(cart.entries()[0].item_id, keep);
        assert_eq!(cart.entries()[0].quantity, 5);
    }

    #[test]
    fn update_leaves_unreferenced_entries_alone() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut cart = Cart::default();
        cart.add(entry(a, 10.0, 1));
        cart.add(entry(b, 20.0, 2));

        cart.update(&HashMap::from([(a, 4)]));

        assert_eq!(cart.entries().len(), 2);
        assert_eq!(cart.total(), 4.0 * 10.0 + 2.0 * 20.0);
    }

    #[test]
    fn clear_empties_the_cart() {
        let mut cart = Cart::default();
        cart.add(entry(Uuid::new_v4(), 45.0, 2));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), 0.0);
    }

    #[tokio::test]
    async fn store_isolates_sessions() {
        let store = CartStore::default();
        let id = Uuid::new_v4();

        store.with("a", |cart| cart.add(entry(id, 45.0, 2))).await;
        store.with("b", |cart| cart.add(entry(id, 45.0, 1))).await;

        assert_eq!(store.snapshot("a").await.total(), 90.0);
        assert_eq!(store.snapshot("b").await.total(), 45.0);
        assert!(store.snapshot("c").await.is_empty());

        store.clear("a").await;
        assert!(store.snapshot("a").await.is_empty());
    }
}
