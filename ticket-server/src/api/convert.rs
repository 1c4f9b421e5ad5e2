//! 类型转换模块
//!
//! 将数据库模型转换为 API 响应模型 (脱敏、裁剪)

use serde::Serialize;

use crate::db::models::{AccountStatus, Booking, Event, Role, User};

/// Sanitized user payload - never carries the password hash
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub account_status: AccountStatus,
    pub last_login: Option<String>,
    pub created_at: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id_string(),
            name: user.name,
            email: user.email,
            role: user.role,
            account_status: user.account_status,
            last_login: user.last_login,
            created_at: user.created_at,
        }
    }
}

/// Compact event payload embedded in booking listings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub id: String,
    pub name: String,
    pub location: String,
    pub date: String,
    pub image_url: String,
}

impl From<Event> for EventSummary {
    fn from(event: Event) -> Self {
        Self {
            id: event.id_string(),
            name: event.name,
            location: event.location,
            date: event.date,
            image_url: event.image_url,
        }
    }
}

/// Booking with its event summary attached
#[derive(Debug, Clone, Serialize)]
pub struct BookingWithEvent {
    #[serde(flatten)]
    pub booking: Booking,
    pub event_details: Option<EventSummary>,
}
