use crate::error::{AdminError, AdminResult};
use crate::site::AdminSite;
use qdeck_domain::registry::{SidebarGroup, SidebarItem, humanize};
use std::str::FromStr;

/// Which registry a sidebar collection draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarKind {
    /// Model-registry entries, grouped by application label.
    Apps,
    /// Hand-registered view entries, grouped by view label.
    Views,
}

impl FromStr for SidebarKind {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apps" => Ok(Self::Apps),
            "views" => Ok(Self::Views),
            other => Err(AdminError::configuration(format!(
                "Unsupported sidebar collection kind: {other}"
            ))),
        }
    }
}

/// Assemble sidebar entries for models and registered views.
#[derive(Debug)]
pub struct SidebarBuilder;

impl SidebarBuilder {
    /// Grouped sidebar entries for the requested kind.
    #[must_use]
    pub fn collect(
        site: &AdminSite,
        kind: SidebarKind,
        settings: bool,
    ) -> Vec<(String, Vec<SidebarItem>)> {
        match kind {
            SidebarKind::Apps => Self::collect_apps(site, settings),
            SidebarKind::Views => site.get_sidebar_views(settings),
        }
    }

    /// The final sidebar structure for template consumption.
    ///
    /// Model-registry groups form the base; view-entry groups merge into the
    /// same label buckets. Every merged view entry's `model_name` is
    /// reconciled from its URL path, since view entries carry a path string
    /// rather than a structured `(app, model)` pair.
    pub fn build(site: &AdminSite, settings_mode: bool) -> AdminResult<Vec<SidebarGroup>> {
        let snapshot = site.settings();
        let views_segments = Self::split_prefix(&snapshot.views_prefix);
        let orm_segments = Self::split_prefix(&snapshot.orm_prefix);
        let settings_segments = Self::split_prefix(&snapshot.settings_prefix);

        let raw_apps = Self::collect(site, SidebarKind::Apps, settings_mode);
        let view_groups = Self::collect(site, SidebarKind::Views, settings_mode);

        let mut combined: Vec<(String, Vec<SidebarItem>)> = raw_apps;
        for (label, entries) in view_groups {
            let mut entries = entries;
            for entry in &mut entries {
                Self::synchronize_view_model_name(
                    entry,
                    &views_segments,
                    &orm_segments,
                    &settings_segments,
                );
            }
            match combined.iter_mut().find(|(existing, _)| *existing == label) {
                Some((_, bucket)) => bucket.extend(entries),
                None => combined.push((label, entries)),
            }
        }

        for (_, models) in &mut combined {
            models.sort_by_key(|item| item.display_name.to_lowercase());
        }
        combined.sort_by_key(|(label, _)| label.to_lowercase());

        Ok(combined
            .into_iter()
            .map(|(label, models)| SidebarGroup {
                display: site.format_app_label(&label),
                label,
                models,
            })
            .collect())
    }

    fn collect_apps(site: &AdminSite, settings: bool) -> Vec<(String, Vec<SidebarItem>)> {
        let snapshot = site.settings();
        let mut groups: Vec<(String, Vec<SidebarItem>)> = Vec::new();

        for entry in site.view_entries() {
            if entry.settings != settings {
                continue;
            }
            let admin = site.model_admin(&entry.app, &entry.model);
            let display = admin
                .as_ref()
                .map(|admin| admin.verbose_name_plural().to_owned())
                .or_else(|| entry.name.clone())
                .unwrap_or_else(|| humanize(&entry.model));
            let section =
                if entry.settings { &snapshot.settings_prefix } else { &snapshot.orm_prefix };
            let item = SidebarItem {
                model_name: entry.model.clone(),
                display_name: display,
                path: format!("{section}/{}/{}", entry.app, entry.model),
                icon: entry.icon.clone(),
                settings: entry.settings,
            };
            match groups.iter_mut().find(|(label, _)| *label == entry.app) {
                Some((_, items)) => items.push(item),
                None => groups.push((entry.app.clone(), vec![item])),
            }
        }

        for (_, models) in &mut groups {
            models.sort_by_key(|item| item.display_name.to_lowercase());
        }
        groups.sort_by_key(|(label, _)| label.to_lowercase());
        groups
    }

    fn split_prefix(prefix: &str) -> Vec<String> {
        prefix
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_lowercase)
            .collect()
    }

    /// Reconcile a view entry's slug against its actual URL path.
    ///
    /// Prefix priority is views, then ORM, then settings. When a prefix
    /// matches, the slug is the segment after the app-label segment when at
    /// least two trailing segments remain, otherwise the sole trailing
    /// segment. When nothing matches, all path segments joined by `_` — which
    /// can collide between unrelated views sharing path depth, exactly as the
    /// source behavior does.
    fn synchronize_view_model_name(
        entry: &mut SidebarItem,
        views_segments: &[String],
        orm_segments: &[String],
        settings_segments: &[String],
    ) {
        if entry.path.is_empty() {
            return;
        }
        let path_segments: Vec<String> = entry
            .path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_lowercase)
            .collect();
        if path_segments.is_empty() {
            return;
        }

        let slug = Self::match_prefix_slug(&path_segments, views_segments)
            .or_else(|| Self::match_prefix_slug(&path_segments, orm_segments))
            .or_else(|| Self::match_prefix_slug(&path_segments, settings_segments))
            .unwrap_or_else(|| path_segments.join("_"));
        entry.model_name = slug;
    }

    fn match_prefix_slug(path_segments: &[String], prefix_segments: &[String]) -> Option<String> {
        if prefix_segments.is_empty() || path_segments.len() < prefix_segments.len() {
            return None;
        }
        if path_segments[..prefix_segments.len()] != *prefix_segments {
            return None;
        }
        let trimmed = &path_segments[prefix_segments.len()..];
        match trimmed.len() {
            0 => None,
            1 => Some(trimmed[0].clone()),
            _ => Some(trimmed[1].clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(path: &str) -> SidebarItem {
        SidebarItem {
            model_name: String::new(),
            display_name: "x".to_owned(),
            path: path.to_owned(),
            icon: None,
            settings: false,
        }
    }

    fn segments(prefix: &str) -> Vec<String> {
        SidebarBuilder::split_prefix(prefix)
    }

    #[test]
    fn slug_is_segment_after_app_label_when_deep_enough() {
        let mut entry = item("/views/demo/list");
        SidebarBuilder::synchronize_view_model_name(
            &mut entry,
            &segments("/views"),
            &segments("/orm"),
            &segments("/settings"),
        );
        assert_eq!(entry.model_name, "list");
    }

    #[test]
    fn slug_is_sole_trailing_segment_when_shallow() {
        let mut entry = item("/views/solo");
        SidebarBuilder::synchronize_view_model_name(
            &mut entry,
            &segments("/views"),
            &segments("/orm"),
            &segments("/settings"),
        );
        assert_eq!(entry.model_name, "solo");
    }

    #[test]
    fn unmatched_prefix_joins_all_segments() {
        let mut entry = item("/custom/reports/weekly");
        SidebarBuilder::synchronize_view_model_name(
            &mut entry,
            &segments("/views"),
            &segments("/orm"),
            &segments("/settings"),
        );
        assert_eq!(entry.model_name, "custom_reports_weekly");
    }

    #[test]
    fn kind_parsing_rejects_unknown_kinds() {
        assert_eq!("apps".parse::<SidebarKind>().unwrap(), SidebarKind::Apps);
        assert_eq!("views".parse::<SidebarKind>().unwrap(), SidebarKind::Views);
        let err = "widgets".parse::<SidebarKind>().expect_err("unsupported kind");
        assert!(matches!(err, AdminError::Configuration { .. }));
        assert!(err.to_string().contains("widgets"));
    }
}
