use async_trait::async_trait;
use reqwest::{Response, StatusCode, Url};
use rust_decimal::Decimal;
use serde::Deserialize;
use tiffin_core::{Address, CatalogError, CatalogRepository};
use tracing::debug;

/// Catalog service client.
///
/// Expects the catalog's REST layout under `base_url`:
/// `{restaurant_id}` for restaurant details and
/// `{restaurant_id}/menuItems/{item_name}` for a single menu item.
#[derive(Clone)]
pub struct HttpCatalogClient {
    client: reqwest::Client,
    base_url: Url,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct MenuItemData {
    menu_item: MenuItemPrice,
}

#[derive(Deserialize)]
struct MenuItemPrice {
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
}

#[derive(Deserialize)]
struct RestaurantData {
    restaurant: RestaurantAddress,
}

#[derive(Deserialize)]
struct RestaurantAddress {
    address: Option<Address>,
}

impl HttpCatalogClient {
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, url::ParseError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
        }
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get(&self, url: Url) -> Result<Response, CatalogError> {
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))
    }
}

#[async_trait]
impl CatalogRepository for HttpCatalogClient {
    async fn menu_item_price(
        &self,
        restaurant_id: &str,
        item_name: &str,
    ) -> Result<Option<Decimal>, CatalogError> {
        let response = self
            .get(self.endpoint(&[restaurant_id, "menuItems", item_name]))
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("Catalog has no item {} for restaurant {}", item_name, restaurant_id);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(CatalogError::Upstream {
                status: status.as_u16(),
                body: read_body(response).await,
            });
        }

        let body: Envelope<MenuItemData> = response
            .json()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))?;

        Ok(Some(body.data.menu_item.price))
    }

    async fn restaurant_address(
        &self,
        restaurant_id: &str,
    ) -> Result<Option<Address>, CatalogError> {
        let response = self.get(self.endpoint(&[restaurant_id])).await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            let body = read_body(response).await;
            debug!("Catalog has no restaurant {}: {}", restaurant_id, body);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(CatalogError::Upstream {
                status: status.as_u16(),
                body: read_body(response).await,
            });
        }

        let body: Envelope<RestaurantData> = response
            .json()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))?;

        body.data
            .restaurant
            .address
            .map(Some)
            .ok_or_else(|| {
                CatalogError::Decode(format!("restaurant {} has no address", restaurant_id))
            })
    }
}

/// Response body as text. A body that cannot be read becomes a note in the text
/// instead of a second failure.
pub async fn read_body(response: Response) -> String {
    match response.text().await {
        Ok(body) => body,
        Err(e) => format!("Error reading response body: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, http::StatusCode as AxumStatus, routing::get, Json, Router};
    use serde_json::json;

    async fn menu_item(
        Path((restaurant_id, item)): Path<(String, String)>,
    ) -> Result<Json<serde_json::Value>, (AxumStatus, String)> {
        match (restaurant_id.as_str(), item.as_str()) {
            ("r1", "burger") => Ok(Json(json!({
                "data": {"menu_item": {"name": "burger", "price": 8.5}}
            }))),
            ("r1", "masala dosa") => Ok(Json(json!({"data": {"menu_item": {"price": 4}}}))),
            ("r1", "broken") => Err((AxumStatus::INTERNAL_SERVER_ERROR, "boom".to_string())),
            _ => Err((AxumStatus::NOT_FOUND, "no such item".to_string())),
        }
    }

    async fn restaurant(
        Path(restaurant_id): Path<String>,
    ) -> Result<Json<serde_json::Value>, (AxumStatus, String)> {
        match restaurant_id.as_str() {
            "r1" => Ok(Json(json!({"data": {"restaurant": {"name": "Saravana", "address": {
                "street": "12 Ring Rd", "city": "Chennai", "state": "TN", "zipcode": "600001"
            }}}}))),
            "r-garbled" => Ok(Json(json!({"data": {}}))),
            "down" => Err((AxumStatus::INTERNAL_SERVER_ERROR, "db offline".to_string())),
            _ => Err((AxumStatus::NOT_FOUND, "NoSuchElement".to_string())),
        }
    }

    async fn spawn_catalog() -> HttpCatalogClient {
        let router = Router::new()
            .route("/api/v1/restaurants/{restaurant_id}", get(restaurant))
            .route("/api/v1/restaurants/{restaurant_id}/menuItems/{item}", get(menu_item));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        HttpCatalogClient::new(&format!("http://{}/api/v1/restaurants/", addr)).unwrap()
    }

    #[test]
    fn test_endpoint_appends_encoded_segments() {
        let client = HttpCatalogClient::new("http://localhost:8080/api/v1/restaurants/").unwrap();
        let url = client.endpoint(&["r1", "menuItems", "masala dosa"]);
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/v1/restaurants/r1/menuItems/masala%20dosa"
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        assert!(HttpCatalogClient::new("mailto:catalog@example.com").is_err());
    }

    #[tokio::test]
    async fn test_menu_item_price() {
        let client = spawn_catalog().await;

        let price = client.menu_item_price("r1", "burger").await.unwrap();
        assert_eq!(price, Some("8.5".parse().unwrap()));

        let price = client.menu_item_price("r1", "masala dosa").await.unwrap();
        assert_eq!(price, Some(Decimal::from(4)));
    }

    #[tokio::test]
    async fn test_missing_menu_item_is_none() {
        let client = spawn_catalog().await;
        assert_eq!(client.menu_item_price("r1", "pizza").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_menu_item_server_error_is_upstream() {
        let client = spawn_catalog().await;
        let err = client.menu_item_price("r1", "broken").await.unwrap_err();
        assert_eq!(
            err,
            CatalogError::Upstream { status: 500, body: "boom".to_string() }
        );
    }

    #[tokio::test]
    async fn test_restaurant_address() {
        let client = spawn_catalog().await;

        let address = client.restaurant_address("r1").await.unwrap().unwrap();
        assert_eq!(address.city, "Chennai");
        assert_eq!(address.zipcode, "600001");

        assert_eq!(client.restaurant_address("r404").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_restaurant_address_failures() {
        let client = spawn_catalog().await;

        let err = client.restaurant_address("down").await.unwrap_err();
        assert!(matches!(err, CatalogError::Upstream { status: 500, .. }));

        let err = client.restaurant_address("r-garbled").await.unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_catalog_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpCatalogClient::new(&format!("http://{}/", addr)).unwrap();
        let err = client.menu_item_price("r1", "burger").await.unwrap_err();
        assert!(matches!(err, CatalogError::Transport(_)));
    }
}
