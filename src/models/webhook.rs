//! 支付方 (Polka) webhook 事件模型

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 升级会员事件
pub const USER_UPGRADED: &str = "user.upgraded";

/// 事件载荷；data 的结构随事件类型变化，只在需要时解析
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl WebhookEvent {
    /// data.user_id，缺失或不是 UUID 时为 None
    pub fn user_id(&self) -> Option<Uuid> {
        self.data.get("user_id")?.as_str()?.parse().ok()
    }
}
