//! Favorites endpoints for the backend client.

use partfinder_core::{DeleteFavoriteResponse, Favorite, FavoriteCreate, FavoritesResponse};

use crate::client::PartfinderClient;
use crate::error::ClientError;

impl PartfinderClient {
    /// Lists all favorites in backend order (most recently ordered first).
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on non-2xx.
    /// - [`ClientError::Deserialize`] if the response shape is unexpected.
    pub async fn list_favorites(&self) -> Result<FavoritesResponse, ClientError> {
        let url = self.endpoint(&["api", "favorites"])?;
        self.send_json(self.client().get(url), "list_favorites")
            .await
    }

    /// Creates a favorite. The backend returns the existing record when one
    /// with the same `search_query` is already stored.
    ///
    /// # Errors
    ///
    /// - [`ClientError::EmptyQuery`] if `search_query` is blank.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on non-2xx.
    /// - [`ClientError::Deserialize`] if the response shape is unexpected.
    pub async fn create_favorite(
        &self,
        part_description: &str,
        search_query: &str,
    ) -> Result<Favorite, ClientError> {
        let search_query = search_query.trim();
        if search_query.is_empty() {
            return Err(ClientError::EmptyQuery);
        }
        let url = self.endpoint(&["api", "favorites"])?;
        let body = FavoriteCreate {
            part_description: part_description.trim().to_string(),
            search_query: search_query.to_string(),
        };
        self.send_json(self.client().post(url).json(&body), "create_favorite")
            .await
    }

    /// Deletes one favorite by id.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotFound`] if no favorite has that id.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on other non-2xx statuses.
    /// - [`ClientError::Deserialize`] if the response shape is unexpected.
    pub async fn delete_favorite(&self, id: &str) -> Result<DeleteFavoriteResponse, ClientError> {
        let url = self.endpoint(&["api", "favorites", id])?;
        self.send_json(
            self.client().delete(url),
            &format!("delete_favorite(id={id})"),
        )
        .await
    }

    /// Increments `times_ordered` for one favorite and returns the updated
    /// record.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotFound`] if no favorite has that id.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on other non-2xx statuses.
    /// - [`ClientError::Deserialize`] if the response shape is unexpected.
    pub async fn increment_favorite_orders(&self, id: &str) -> Result<Favorite, ClientError> {
        let url = self.endpoint(&["api", "favorites", id, "increment-orders"])?;
        self.send_json(
            self.client().post(url),
            &format!("increment_favorite_orders(id={id})"),
        )
        .await
    }
}
