//! Player economy: currency, upgrades and ship skins
//!
//! The economy is the only state that outlives a session. Every mutation is
//! written through to the store immediately so an abrupt exit loses at most
//! the tick in progress.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::persistence::{self, ECONOMY_KEY, Store};

/// Purchasable gameplay upgrades
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Upgrade {
    /// Halves the shot cooldown
    RapidCooldown,
}

impl Upgrade {
    pub fn price(self) -> u64 {
        match self {
            Upgrade::RapidCooldown => 150,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Upgrade::RapidCooldown => "rapid_cooldown",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "rapid_cooldown" | "cooldown" => Some(Upgrade::RapidCooldown),
            _ => None,
        }
    }
}

/// Ship skin identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkinId(pub String);

impl SkinId {
    pub const DEFAULT: &'static str = "classic";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shop price, `None` for skins not in the catalog
    pub fn price(&self) -> Option<u64> {
        SKIN_CATALOG
            .iter()
            .find(|(id, _)| *id == self.0)
            .map(|&(_, price)| price)
    }
}

impl Default for SkinId {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

impl fmt::Display for SkinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Skins on sale (id, price)
pub const SKIN_CATALOG: [(&str, u64); 3] = [(SkinId::DEFAULT, 0), ("crimson", 100), ("phantom", 250)];

/// Rejected shop request; the economy is left unchanged
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShopError {
    #[error("Not enough currency: need {price}, have {balance}")]
    InsufficientFunds { price: u64, balance: u64 },

    #[error("Already owned: {0}")]
    AlreadyOwned(String),

    #[error("Unknown skin: {0}")]
    UnknownSkin(String),

    #[error("Skin not owned: {0}")]
    NotOwned(String),
}

/// Persisted economy record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Economy {
    pub currency: u64,
    pub upgrades: BTreeSet<Upgrade>,
    pub skins: BTreeSet<SkinId>,
    pub selected_skin: SkinId,
}

impl Default for Economy {
    fn default() -> Self {
        Self {
            currency: 0,
            upgrades: BTreeSet::new(),
            skins: BTreeSet::from([SkinId::default()]),
            selected_skin: SkinId::default(),
        }
    }
}

impl Economy {
    /// Repair records that break the ownership invariants
    pub fn validated(mut self) -> Self {
        self.skins.insert(SkinId::default());
        if !self.skins.contains(&self.selected_skin) {
            log::warn!(
                "Selected skin {} is not owned, falling back to {}",
                self.selected_skin,
                SkinId::DEFAULT
            );
            self.selected_skin = SkinId::default();
        }
        self
    }

    pub fn has_upgrade(&self, upgrade: Upgrade) -> bool {
        self.upgrades.contains(&upgrade)
    }

    fn charge(&mut self, price: u64) -> Result<(), ShopError> {
        if self.currency < price {
            return Err(ShopError::InsufficientFunds {
                price,
                balance: self.currency,
            });
        }
        self.currency -= price;
        Ok(())
    }

    pub fn buy_upgrade(&mut self, upgrade: Upgrade) -> Result<(), ShopError> {
        if self.has_upgrade(upgrade) {
            return Err(ShopError::AlreadyOwned(upgrade.as_str().to_string()));
        }
        self.charge(upgrade.price())?;
        self.upgrades.insert(upgrade);
        Ok(())
    }

    pub fn buy_skin(&mut self, skin: &SkinId) -> Result<(), ShopError> {
        let price = skin
            .price()
            .ok_or_else(|| ShopError::UnknownSkin(skin.to_string()))?;
        if self.skins.contains(skin) {
            return Err(ShopError::AlreadyOwned(skin.to_string()));
        }
        self.charge(price)?;
        self.skins.insert(skin.clone());
        Ok(())
    }

    pub fn select_skin(&mut self, skin: &SkinId) -> Result<(), ShopError> {
        if !self.skins.contains(skin) {
            return Err(ShopError::NotOwned(skin.to_string()));
        }
        self.selected_skin = skin.clone();
        Ok(())
    }
}

/// Economy bound to its store; every change is saved before returning
pub struct Account {
    economy: Economy,
    store: Box<dyn Store>,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("economy", &self.economy)
            .finish_non_exhaustive()
    }
}

impl Account {
    pub fn new(economy: Economy, store: Box<dyn Store>) -> Self {
        Self { economy, store }
    }

    /// Load the economy record, repairing or defaulting as needed
    pub fn load(store: Box<dyn Store>) -> Self {
        let economy: Economy = persistence::load_or_default(store.as_ref(), ECONOMY_KEY);
        let economy = economy.validated();
        log::info!(
            "Economy loaded: {} currency, {} upgrades, {} skins",
            economy.currency,
            economy.upgrades.len(),
            economy.skins.len()
        );
        Self { economy, store }
    }

    pub fn economy(&self) -> &Economy {
        &self.economy
    }

    /// Best-effort write; a failure is logged and play continues
    fn persist(&mut self) {
        if let Err(e) = persistence::save_record(self.store.as_mut(), ECONOMY_KEY, &self.economy) {
            log::error!("Failed to save economy: {e}");
        }
    }

    /// Add currency and persist. Returns the new balance.
    pub fn credit(&mut self, amount: u64) -> u64 {
        self.economy.currency = self.economy.currency.saturating_add(amount);
        self.persist();
        self.economy.currency
    }

    pub fn purchase_upgrade(&mut self, upgrade: Upgrade) -> Result<(), ShopError> {
        self.transact(|economy| economy.buy_upgrade(upgrade))
    }

    pub fn purchase_skin(&mut self, skin: &SkinId) -> Result<(), ShopError> {
        self.transact(|economy| economy.buy_skin(skin))
    }

    pub fn select_skin(&mut self, skin: &SkinId) -> Result<(), ShopError> {
        self.transact(|economy| economy.select_skin(skin))
    }

    /// Apply a shop operation; rejections leave the record untouched
    fn transact(&mut self, op: impl FnOnce(&mut Economy) -> Result<(), ShopError>) -> Result<(), ShopError> {
        match op(&mut self.economy) {
            Ok(()) => {
                self.persist();
                Ok(())
            }
            Err(e) => {
                log::warn!("Shop request rejected: {e}");
                Err(e)
            }
        }
    }
}
