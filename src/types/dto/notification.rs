use poem_openapi::Object;

use crate::types::db::notification;

#[derive(Object, Debug)]
pub struct NotificationResponse {
    pub id: String,
    /// orden_enviada, orden_aprobada, orden_rechazada, cierre_solicitado or orden_cerrada
    pub tipo_evento: String,
    pub mensaje: String,
    pub leida: bool,
    pub url_relacionada: Option<String>,
    pub created_at: i64,
}

impl From<notification::Model> for NotificationResponse {
    fn from(n: notification::Model) -> Self {
        Self {
            id: n.id,
            tipo_evento: n.tipo_evento,
            mensaje: n.mensaje,
            leida: n.leida,
            url_relacionada: n.url_relacionada,
            created_at: n.created_at,
        }
    }
}
