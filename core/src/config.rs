//! Table host configuration.
//!
//! A `HostConfig` lists the schemas the table host can deploy. It is usually
//! loaded from TOML:
//!
//! ```toml
//! app_name = "rime.console"
//! default_schema = "demo_pinyin"
//!
//! [[schemas]]
//! schema_id = "demo_pinyin"
//! name = "Demo Pinyin"
//! page_size = 5
//! select_keys = "1234567890"
//!
//! [schemas.switches]
//! simplification = true
//!
//! [schemas.table]
//! ni = ["你", "尼", "泥"]
//! nihao = ["你好"]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HostConfig {
    /// Name reported by the host in its log lines
    pub app_name: String,

    /// Schema selected for new sessions; the first schema when unset
    pub default_schema: Option<String>,

    pub schemas: Vec<SchemaConfig>,
}

/// One input schema: menu settings, option defaults and the code table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub schema_id: String,
    pub name: String,

    /// Candidates per page; unset means the projector default
    pub page_size: Option<usize>,

    /// Keys picking candidates on the current page, empty for none
    pub select_keys: String,

    /// Labels shown instead of the select keys
    pub alternative_select_labels: Option<Vec<String>>,

    /// Option values applied when the schema is selected
    pub switches: BTreeMap<String, bool>,

    /// Code → candidate texts, in display order
    pub table: BTreeMap<String, Vec<String>>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            app_name: "rime.console".to_string(),
            default_schema: None,
            schemas: Vec::new(),
        }
    }
}

impl HostConfig {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let content = self.to_toml_string()?;
        std::fs::write(path, content).with_context(|| format!("writing config {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn schema(&self, schema_id: &str) -> Option<&SchemaConfig> {
        self.schemas.iter().find(|s| s.schema_id == schema_id)
    }

    /// Built-in configuration used when no file is given: a small pinyin
    /// table and a stroke-style table with alternative labels.
    pub fn demo() -> Self {
        let pinyin = SchemaConfig {
            schema_id: "demo_pinyin".to_string(),
            name: "Demo Pinyin".to_string(),
            page_size: Some(5),
            select_keys: String::new(),
            alternative_select_labels: None,
            switches: BTreeMap::from([
                ("ascii_mode".to_string(), false),
                ("full_shape".to_string(), false),
                ("simplification".to_string(), true),
            ]),
            table: table(&[
                ("ni", &["你", "尼", "泥", "呢", "逆", "腻", "拟", "倪", "妮"]),
                ("nihao", &["你好"]),
                ("hao", &["好", "号", "毫", "豪", "耗"]),
                ("zhong", &["中", "种", "重", "众"]),
                ("zhongguo", &["中国"]),
                ("guo", &["国", "过", "果", "锅"]),
                ("wo", &["我", "握", "窝"]),
                ("women", &["我们"]),
            ]),
        };
        let stroke = SchemaConfig {
            schema_id: "demo_stroke".to_string(),
            name: "Demo Stroke".to_string(),
            page_size: Some(3),
            select_keys: "asd".to_string(),
            alternative_select_labels: Some(vec!["①".into(), "②".into(), "③".into()]),
            switches: BTreeMap::from([("simplification".to_string(), false)]),
            table: table(&[
                ("h", &["一", "二", "三", "十"]),
                ("hs", &["丁", "七"]),
                ("s", &["丨", "上", "卜"]),
                ("p", &["丿", "八", "人"]),
            ]),
        };
        Self {
            app_name: "rime.console".to_string(),
            default_schema: Some(pinyin.schema_id.clone()),
            schemas: vec![pinyin, stroke],
        }
    }
}

fn table(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(code, texts)| {
            (
                code.to_string(),
                texts.iter().map(|t| t.to_string()).collect(),
            )
        })
        .collect()
}
