use std::collections::BTreeMap;

pub const DEFAULT_ACTION: &str = "index";

/// A parsed fragment: `#/<module>/<action>/<params...>?k=v&k2=v2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub module: String,
    pub action: String,
    pub params: Vec<String>,
    pub query: BTreeMap<String, String>,
}

impl Route {
    /// Returns `None` for fragments that name no module (`""`, `#`, `#/`).
    pub fn parse(fragment: &str) -> Option<Route> {
        let raw = fragment.trim().trim_start_matches('#').trim_start_matches('/');
        let (path, query_str) = match raw.split_once('?') {
            Some((path, query)) => (path, query),
            None => (raw, ""),
        };

        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let module = segments.next()?.to_lowercase();
        let action = segments
            .next()
            .map(|a| a.to_lowercase())
            .unwrap_or_else(|| DEFAULT_ACTION.to_string());
        let params = segments.map(str::to_string).collect();

        let query = query_str
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((k, v)) => (k.to_string(), v.to_string()),
                None => (pair.to_string(), String::new()),
            })
            .collect();

        Some(Route {
            module,
            action,
            params,
            query,
        })
    }

    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }

    /// Canonical fragment for this route.
    pub fn fragment(&self) -> String {
        let mut out = format!("#/{}", self.module);
        if self.action != DEFAULT_ACTION || !self.params.is_empty() {
            out.push('/');
            out.push_str(&self.action);
        }
        for param in &self.params {
            out.push('/');
            out.push_str(param);
        }
        if !self.query.is_empty() {
            let pairs: Vec<String> =
                self.query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            out.push('?');
            out.push_str(&pairs.join("&"));
        }
        out
    }
}
