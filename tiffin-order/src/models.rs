use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tiffin_core::{Address, MenuItems};
use tiffin_shared::Masked;

/// OrderService.Create input. Credentials travel separately in request metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub restaurant_id: String,
    #[serde(default)]
    pub menu_items: MenuItems,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub id: i64,
    pub username: String,
    pub restaurant_id: String,
    pub menu_items: MenuItems,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

/// UserService.Register input. Absent fields deserialize as empty and are
/// rejected by validation rather than by the decoder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterUserRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: Masked<String>,
    #[serde(default)]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterUserResponse {
    pub username: String,
    pub address: Address,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_order_request_wire_names() {
        let json = r#"{"restaurantId":"r1","menuItems":{"burger":2}}"#;
        let request: CreateOrderRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.restaurant_id, "r1");
        assert_eq!(request.menu_items.get("burger"), Some(&2));
    }

    #[test]
    fn test_create_order_response_total_is_a_number() {
        let response = CreateOrderResponse {
            id: 1,
            username: "alice".to_string(),
            restaurant_id: "r1".to_string(),
            menu_items: MenuItems::from([("burger".to_string(), 2)]),
            total_price: Decimal::new(1700, 2),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["totalPrice"], 17.0);
        assert_eq!(json["restaurantId"], "r1");
    }

    #[test]
    fn test_register_request_tolerates_missing_fields() {
        let request: RegisterUserRequest =
            serde_json::from_str(r#"{"password":"pw1","address":{"street":"1 Main"}}"#).unwrap();
        assert!(request.username.is_empty());
        assert_eq!(request.address.unwrap().city, "");
    }
}
