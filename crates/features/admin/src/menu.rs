use parking_lot::RwLock;
use qdeck_domain::registry::MenuItem;
use tracing::trace;

/// Accumulates main and user navigation entries in registration order.
///
/// Registration order is the display order. Re-registering a path updates the
/// existing entry in place so repeated system-app readiness never duplicates
/// the menu.
#[derive(Debug, Default)]
pub struct MenuBuilder {
    main: RwLock<Vec<MenuItem>>,
    user: RwLock<Vec<MenuItem>>,
}

impl MenuBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_item(&self, item: MenuItem) {
        Self::upsert(&self.main, item);
    }

    pub fn register_user_item(&self, item: MenuItem) {
        Self::upsert(&self.user, item);
    }

    fn upsert(bucket: &RwLock<Vec<MenuItem>>, item: MenuItem) {
        let mut items = bucket.write();
        match items.iter_mut().find(|existing| existing.path == item.path) {
            Some(existing) => {
                trace!(path = %item.path, "Menu entry updated in place");
                *existing = item;
            },
            None => items.push(item),
        }
    }

    /// Main navigation, in registration order.
    #[must_use]
    pub fn build_main_menu(&self) -> Vec<MenuItem> {
        self.main.read().clone()
    }

    /// User menu (profile/logout area), in registration order.
    #[must_use]
    pub fn build_user_menu(&self) -> Vec<MenuItem> {
        self.user.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdeck_domain::registry::PageKind;

    fn item(title: &str, path: &str) -> MenuItem {
        MenuItem { title: title.to_owned(), path: path.to_owned(), icon: None, kind: PageKind::View }
    }

    #[test]
    fn registration_order_is_preserved() {
        let menu = MenuBuilder::new();
        menu.register_item(item("Dashboard", "/"));
        menu.register_item(item("Views", "/views"));
        menu.register_item(item("Settings", "/settings"));

        let titles: Vec<_> = menu.build_main_menu().into_iter().map(|i| i.title).collect();
        assert_eq!(titles, vec!["Dashboard", "Views", "Settings"]);
    }

    #[test]
    fn same_path_registration_updates_in_place() {
        let menu = MenuBuilder::new();
        menu.register_item(item("Dashboard", "/"));
        menu.register_item(item("Views", "/views"));
        menu.register_item(item("Home", "/"));

        let items = menu.build_main_menu();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Home");
    }
}
