//! Permission Definitions
//!
//! Role-scoped access to the back-office sections.
//!
//! ## 设计原则
//! - 顾客端（菜单、下单、实时流）无需登录
//! - 后台按板块授权：每个角色对七个板块各有一个布尔开关
//! - 板块是类型化枚举，访问检查走穷尽 match，不做字符串查表
//! - admin 角色受 is_system 保护，不可降权

use serde::{Deserialize, Serialize};

/// Back-office sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Dashboard,
    Orders,
    Menu,
    Inventory,
    Analytics,
    Users,
    Settings,
}

impl Section {
    /// All sections, in sidebar order
    pub const ALL: [Section; 7] = [
        Section::Dashboard,
        Section::Orders,
        Section::Menu,
        Section::Inventory,
        Section::Analytics,
        Section::Users,
        Section::Settings,
    ];
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Section::Dashboard => "dashboard",
            Section::Orders => "orders",
            Section::Menu => "menu",
            Section::Inventory => "inventory",
            Section::Analytics => "analytics",
            Section::Users => "users",
            Section::Settings => "settings",
        };
        write!(f, "{}", s)
    }
}

/// Per-role boolean access matrix over the sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SectionAccess {
    #[serde(default)]
    pub dashboard: bool,
    #[serde(default)]
    pub orders: bool,
    #[serde(default)]
    pub menu: bool,
    #[serde(default)]
    pub inventory: bool,
    #[serde(default)]
    pub analytics: bool,
    #[serde(default)]
    pub users: bool,
    #[serde(default)]
    pub settings: bool,
}

impl SectionAccess {
    /// Everything on (admin)
    pub fn all() -> Self {
        Self {
            dashboard: true,
            orders: true,
            menu: true,
            inventory: true,
            analytics: true,
            users: true,
            settings: true,
        }
    }

    /// Exhaustive access check - the only gate
    pub fn allows(&self, section: Section) -> bool {
        match section {
            Section::Dashboard => self.dashboard,
            Section::Orders => self.orders,
            Section::Menu => self.menu,
            Section::Inventory => self.inventory,
            Section::Analytics => self.analytics,
            Section::Users => self.users,
            Section::Settings => self.settings,
        }
    }
}

/// Default access for the built-in roles
pub fn default_access(role_name: &str) -> SectionAccess {
    match role_name {
        "admin" => SectionAccess::all(),
        "manager" => SectionAccess {
            dashboard: true,
            orders: true,
            menu: true,
            inventory: true,
            analytics: true,
            users: false,
            settings: true,
        },
        // 厨房：只看订单
        "kitchen" => SectionAccess {
            orders: true,
            ..SectionAccess::default()
        },
        "staff" => SectionAccess {
            dashboard: true,
            orders: true,
            ..SectionAccess::default()
        },
        _ => SectionAccess::default(),
    }
}

/// Role record as served over the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    pub access: SectionAccess,
    /// System roles (admin) cannot be edited or deleted
    #[serde(default)]
    pub is_system: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_allows_everything() {
        let access = default_access("admin");
        for section in Section::ALL {
            assert!(access.allows(section), "admin must allow {}", section);
        }
    }

    #[test]
    fn kitchen_sees_orders_only() {
        let access = default_access("kitchen");
        assert!(access.allows(Section::Orders));
        assert!(!access.allows(Section::Users));
        assert!(!access.allows(Section::Settings));
    }

    #[test]
    fn unknown_role_allows_nothing() {
        let access = default_access("waiter-3000");
        for section in Section::ALL {
            assert!(!access.allows(section));
        }
    }

    #[test]
    fn unknown_section_key_is_rejected() {
        // Typed enum: arbitrary keys never deserialize into a Section
        let result: Result<Section, _> = serde_json::from_str("\"backdoor\"");
        assert!(result.is_err());
    }
}
