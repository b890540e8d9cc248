use actix_web::HttpResponseBuilder;

use url::form_urlencoded::byte_serialize;

/// Adds the `X-<app>-alert`/`X-<app>-params` headers that announce entity mutations to the client UI
#[derive(Debug, Clone)]
pub struct Alerts {
    app_name: String,
}

impl Alerts {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    pub fn alert_header(&self) -> String {
        format!("X-{}-alert", self.app_name)
    }

    pub fn params_header(&self) -> String {
        format!("X-{}-params", self.app_name)
    }

    pub fn created(&self, res: &mut HttpResponseBuilder, entity_name: &str, id: i64) {
        let message = format!("A new {} is created with identifier {}", entity_name, id);
        self.apply(res, message, id);
    }

    pub fn updated(&self, res: &mut HttpResponseBuilder, entity_name: &str, id: i64) {
        let message = format!("A {} is updated with identifier {}", entity_name, id);
        self.apply(res, message, id);
    }

    pub fn deleted(&self, res: &mut HttpResponseBuilder, entity_name: &str, id: i64) {
        let message = format!("A {} is deleted with identifier {}", entity_name, id);
        self.apply(res, message, id);
    }

    fn apply(&self, res: &mut HttpResponseBuilder, message: String, id: i64) {
        let param: String = byte_serialize(id.to_string().as_bytes()).collect();

        res.insert_header((self.alert_header(), message))
            .insert_header((self.params_header(), param));
    }
}
