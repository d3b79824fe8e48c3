use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::core::models::EffectConfig;

/// 应用配置，缺省时使用线上部署的固定参数
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_cdn_origin")]
    pub cdn_origin: String,
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default = "default_effect_id")]
    pub effect_id: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_tool_type")]
    pub tool_type: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl AppConfig {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = config_path.unwrap_or_else(|| Path::new("config.toml"));
        if path.exists() {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
            return Self::parse(&raw)
                .with_context(|| format!("解析配置文件失败: {}", path.display()));
        }
        Ok(AppConfig::default())
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// 提交和轮询用的部署参数
    pub fn effect_config(&self) -> EffectConfig {
        EffectConfig {
            api_base_url: self.api_base_url.clone(),
            user_id: self.user_id.clone(),
            effect_id: self.effect_id.clone(),
            model: self.model.clone(),
            tool_type: self.tool_type.clone(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            cdn_origin: default_cdn_origin(),
            user_id: default_user_id(),
            effect_id: default_effect_id(),
            model: default_model(),
            tool_type: default_tool_type(),
            poll_interval_ms: default_poll_interval_ms(),
            max_polls: default_max_polls(),
            request_timeout_secs: default_request_timeout_secs(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.chromastudio.ai".to_string()
}

fn default_cdn_origin() -> String {
    "https://contents.maxstudio.ai".to_string()
}

fn default_user_id() -> String {
    "DObRu1vyStbUynoQmTcHBlhs55z2".to_string()
}

fn default_effect_id() -> String {
    "mugshot".to_string()
}

fn default_model() -> String {
    "image-effects".to_string()
}

fn default_tool_type() -> String {
    "image-effects".to_string()
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_max_polls() -> u32 {
    60
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_output_dir() -> String {
    "downloads".to_string()
}
