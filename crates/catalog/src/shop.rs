//! Multi-shop scoping.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use backoffice_core::{DomainError, ShopGroupId, ShopId};

/// The scope a command or query applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "scope", content = "id")]
pub enum ShopConstraint {
    Shop(ShopId),
    ShopGroup(ShopGroupId),
    AllShops,
}

impl ShopConstraint {
    pub fn shop_id(&self) -> Option<ShopId> {
        match self {
            ShopConstraint::Shop(id) => Some(*id),
            _ => None,
        }
    }
}

/// What the employee picked in the shop switcher.
///
/// Serialized as `s-<id>` (one shop), `g-<id>` (a shop group) or an empty
/// string / `all` (every shop).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShopSelection {
    Shop(ShopId),
    Group(ShopGroupId),
    #[default]
    All,
}

impl FromStr for ShopSelection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(ShopSelection::All);
        }
        match s.split_once('-') {
            Some(("s", id)) => Ok(ShopSelection::Shop(id.parse()?)),
            Some(("g", id)) => Ok(ShopSelection::Group(id.parse()?)),
            _ => Err(DomainError::validation(format!("unknown shop context '{s}'"))),
        }
    }
}

/// Shop-context service consumed by the admin.
pub trait ShopContext: Send + Sync {
    /// True when exactly one shop is being administered.
    fn is_single_shop_context(&self) -> bool;

    /// The shop being administered, when there is exactly one.
    fn context_shop_id(&self) -> Option<ShopId>;

    fn shop_constraint(&self) -> ShopConstraint;
}

/// Per-request shop context: the employee's selection interpreted against the
/// multi-shop configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestShopContext {
    multishop_active: bool,
    default_shop: ShopId,
    selection: ShopSelection,
}

impl RequestShopContext {
    pub fn new(multishop_active: bool, default_shop: ShopId, selection: ShopSelection) -> Self {
        Self {
            multishop_active,
            default_shop,
            selection,
        }
    }

    /// Context of a single-shop installation.
    pub fn single(shop: ShopId) -> Self {
        Self::new(false, shop, ShopSelection::Shop(shop))
    }

    pub fn selection(&self) -> ShopSelection {
        self.selection
    }
}

impl ShopContext for RequestShopContext {
    fn is_single_shop_context(&self) -> bool {
        !self.multishop_active || matches!(self.selection, ShopSelection::Shop(_))
    }

    fn context_shop_id(&self) -> Option<ShopId> {
        if !self.multishop_active {
            return Some(self.default_shop);
        }
        match self.selection {
            ShopSelection::Shop(id) => Some(id),
            _ => None,
        }
    }

    fn shop_constraint(&self) -> ShopConstraint {
        if !self.multishop_active {
            return ShopConstraint::Shop(self.default_shop);
        }
        match self.selection {
            ShopSelection::Shop(id) => ShopConstraint::Shop(id),
            ShopSelection::Group(id) => ShopConstraint::ShopGroup(id),
            ShopSelection::All => ShopConstraint::AllShops,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shop(id: u32) -> ShopId {
        ShopId::new(id).unwrap()
    }

    #[test]
    fn parses_switcher_values() {
        assert_eq!("s-2".parse::<ShopSelection>().unwrap(), ShopSelection::Shop(shop(2)));
        assert_eq!(
            "g-1".parse::<ShopSelection>().unwrap(),
            ShopSelection::Group(ShopGroupId::new(1).unwrap())
        );
        assert_eq!("".parse::<ShopSelection>().unwrap(), ShopSelection::All);
        assert!("x-1".parse::<ShopSelection>().is_err());
        assert!("s-0".parse::<ShopSelection>().is_err());
    }

    #[test]
    fn multishop_off_always_means_default_shop() {
        let ctx = RequestShopContext::new(false, shop(1), ShopSelection::All);
        assert!(ctx.is_single_shop_context());
        assert_eq!(ctx.context_shop_id(), Some(shop(1)));
        assert_eq!(ctx.shop_constraint(), ShopConstraint::Shop(shop(1)));
    }

    #[test]
    fn all_shops_is_not_a_single_shop_context() {
        let ctx = RequestShopContext::new(true, shop(1), ShopSelection::All);
        assert!(!ctx.is_single_shop_context());
        assert_eq!(ctx.context_shop_id(), None);
        assert_eq!(ctx.shop_constraint(), ShopConstraint::AllShops);
    }

    #[test]
    fn selected_shop_wins_over_default() {
        let ctx = RequestShopContext::new(true, shop(1), ShopSelection::Shop(shop(3)));
        assert!(ctx.is_single_shop_context());
        assert_eq!(ctx.context_shop_id(), Some(shop(3)));
    }
}
