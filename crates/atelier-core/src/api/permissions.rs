use anyhow::Result;
use serde_json::json;

use super::ApiClient;
use crate::models::ServerEnvelope;

impl ApiClient {
    /// Menu permission keys granted to the signed-in user.
    pub async fn fetch_my_menu_permissions(&self) -> Result<ServerEnvelope> {
        self.post_empty("/menu-permission/my").await
    }

    pub async fn fetch_all_menu_items(&self) -> Result<ServerEnvelope> {
        self.post_empty("/menu-permission/menus").await
    }

    pub async fn update_user_menu_permissions(
        &self,
        user_id: &str,
        menu_permissions: &[String],
    ) -> Result<ServerEnvelope> {
        self.post(
            &format!("/menu-permission/user/{}", user_id),
            &json!({ "menuPermissions": menu_permissions }),
        )
        .await
    }

    pub async fn update_user_vip_level(&self, user_id: &str, vip_level: u32) -> Result<ServerEnvelope> {
        self.post(
            &format!("/menu-permission/user/{}/vip-level", user_id),
            &json!({ "vipLevel": vip_level }),
        )
        .await
    }
}
