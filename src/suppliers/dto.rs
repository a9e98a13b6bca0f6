use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateSupplierRequest {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSupplierRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_body_leaves_other_fields_absent() {
        let req: UpdateSupplierRequest = serde_json::from_str(r#"{"name": "X"}"#).unwrap();
        assert_eq!(req.name.as_deref(), Some("X"));
        assert!(req.phone.is_none());
        assert!(req.address.is_none());
    }

    #[test]
    fn create_requires_only_name() {
        let req: CreateSupplierRequest =
            serde_json::from_str(r#"{"name": "Acme Foods"}"#).unwrap();
        assert_eq!(req.name, "Acme Foods");
        assert!(req.phone.is_none());
    }
}
