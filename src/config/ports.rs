use std::collections::BTreeSet;
use super::types::PortScanConfig;

#[derive(Debug, Clone)]
struct Category {
    name: String,
    ports: BTreeSet<u16>,
    probes: Option<String>,
}

/// Read-only lookup from port categories to ports and probe sets. Built once
/// from the config and passed to the stages that need it.
#[derive(Debug, Clone)]
pub struct PortCategoryIndex {
    categories: Vec<Category>,
    interesting: BTreeSet<u16>,
    fallback_probes: String,
}

impl PortCategoryIndex {
    pub fn from_config(config: &PortScanConfig) -> Self {
        let categories: Vec<Category> = config
            .categories
            .iter()
            .map(|c| Category {
                name: c.name.clone(),
                ports: c.ports.iter().copied().collect(),
                probes: c.probes.clone().filter(|p| !p.trim().is_empty()),
            })
            .collect();

        let interesting = categories
            .iter()
            .flat_map(|c| c.ports.iter().copied())
            .collect();

        Self {
            categories,
            interesting,
            fallback_probes: config.fallback_probes.clone(),
        }
    }

    /// Union of every category's ports.
    pub fn interesting_ports(&self) -> &BTreeSet<u16> {
        &self.interesting
    }

    pub fn ports_for(&self, category: &str) -> Option<&BTreeSet<u16>> {
        self.find(category).map(|c| &c.ports)
    }

    pub fn probes_for(&self, category: &str) -> &str {
        self.find(category)
            .and_then(|c| c.probes.as_deref())
            .unwrap_or(&self.fallback_probes)
    }

    /// Categories whose ports intersect `ports`, in configured order.
    pub fn matching_categories<'a, 'b>(&'a self, ports: &'b BTreeSet<u16>) -> impl Iterator<Item = &'a str> + use<'a, 'b> {
        self.categories
            .iter()
            .filter(move |c| !c.ports.is_disjoint(ports))
            .map(|c| c.name.as_str())
    }

    /// Comma-joined probe sets of every matching category that has one, or the
    /// fallback set when none does.
    pub fn select_probes(&self, ports: &BTreeSet<u16>) -> String {
        let mut selected: Vec<&str> = Vec::new();

        for category in &self.categories {
            let Some(probes) = category.probes.as_deref() else {
                continue;
            };
            if category.ports.is_disjoint(ports) || selected.contains(&probes) {
                continue;
            }
            selected.push(probes);
        }

        if selected.is_empty() {
            self.fallback_probes.clone()
        } else {
            selected.join(",")
        }
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    fn find(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::CategoryConfig;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn index() -> PortCategoryIndex {
        PortCategoryIndex::from_config(&PortScanConfig::default())
    }

    fn ports(list: &[u16]) -> BTreeSet<u16> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_union_is_deduplicated_and_sorted() {
        let index = index();
        let union: Vec<u16> = index.interesting_ports().iter().copied().collect();
        assert_eq!(union.first(), Some(&80));
        assert_eq!(union.last(), Some(&27017));
        assert_eq!(union.iter().filter(|p| **p == 8080).count(), 1);
        assert!(union.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_shared_port_matches_both_categories() {
        let index = index();
        let matched: Vec<&str> = index.matching_categories(&ports(&[8080])).collect();
        assert_eq!(matched, vec!["web", "ci/cd"]);
        assert!(index.ports_for("ci/cd").unwrap().contains(&8080));
    }

    #[test]
    fn test_matched_names_outlive_the_port_set() {
        let index = index();
        let matched: Vec<&str> = {
            let open = ports(&[8080, 22]);
            index.matching_categories(&open).collect()
        };
        assert_eq!(matched, vec!["web", "ci/cd"]);
    }

    #[rstest]
    #[case(&[80, 3306], "http-title,http-headers,http-methods,http-enum,mysql-info,mongodb-info,redis-info")]
    #[case(&[3306, 443], "http-title,http-headers,http-methods,http-enum,mysql-info,mongodb-info,redis-info")]
    #[case(&[6443], "docker-info,kubernetes-info")]
    #[case(&[9222, 27017], "mysql-info,mongodb-info,redis-info,banner")]
    #[case(&[2082], "default")]
    #[case(&[9418, 3690], "default")]
    #[case(&[], "default")]
    fn test_select_probes(#[case] open: &[u16], #[case] expected: &str) {
        assert_eq!(index().select_probes(&ports(open)), expected);
    }

    #[test]
    fn test_probes_for_falls_back() {
        let index = index();
        assert_eq!(index.probes_for("debug"), "banner");
        assert_eq!(index.probes_for("cms"), "default");
        assert_eq!(index.probes_for("no-such-category"), "default");
    }

    #[test]
    fn test_identical_probe_sets_are_not_repeated() {
        let config = PortScanConfig {
            categories: vec![
                CategoryConfig { name: "a".into(), ports: vec![1], probes: Some("banner".into()) },
                CategoryConfig { name: "b".into(), ports: vec![2], probes: Some("banner".into()) },
            ],
            ..PortScanConfig::default()
        };
        let index = PortCategoryIndex::from_config(&config);
        assert_eq!(index.select_probes(&ports(&[1, 2])), "banner");
    }
}
