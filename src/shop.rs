//! Theme shop rules
//!
//! Selecting an owned theme equips it. Selecting an unowned theme buys it if
//! the wallet covers the cost (buying does not equip). Anything else is denied
//! and changes nothing.

use crate::persistence::PlayerData;
use crate::theme::{ThemeId, catalog};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopOutcome {
    Equipped(ThemeId),
    Purchased(ThemeId),
    /// Not owned and not affordable
    Denied { cost: u32, currency: u32 },
}

impl ShopOutcome {
    /// Whether the progress record changed and should be saved
    pub fn changed(&self) -> bool {
        !matches!(self, ShopOutcome::Denied { .. })
    }
}

pub fn select_theme(data: &mut PlayerData, id: ThemeId) -> ShopOutcome {
    if data.owns(id) {
        data.equipped_theme = id;
        log::info!("Equipped theme {}", id.as_str());
        return ShopOutcome::Equipped(id);
    }

    let cost = id.theme().cost;
    if data.currency >= cost {
        data.currency -= cost;
        data.inventory.insert(id);
        log::info!("Purchased theme {} for {}", id.as_str(), cost);
        ShopOutcome::Purchased(id)
    } else {
        ShopOutcome::Denied {
            cost,
            currency: data.currency,
        }
    }
}

/// One row of the shop screen
#[derive(Debug, Clone, PartialEq)]
pub struct ShopEntry {
    pub id: ThemeId,
    pub name: &'static str,
    pub cost: u32,
    pub owned: bool,
    pub equipped: bool,
    pub affordable: bool,
}

impl ShopEntry {
    /// Button caption
    pub fn status_text(&self) -> String {
        if self.equipped {
            "EQUIPPED".to_string()
        } else if self.owned {
            "OWNED".to_string()
        } else {
            format!("{} CR", self.cost)
        }
    }
}

pub fn listing(data: &PlayerData) -> Vec<ShopEntry> {
    catalog()
        .map(|theme| ShopEntry {
            id: theme.id,
            name: theme.name,
            cost: theme.cost,
            owned: data.owns(theme.id),
            equipped: data.equipped_theme == theme.id,
            affordable: data.currency >= theme.cost,
        })
        .collect()
}
