use std::sync::Arc;

use crate::db::{ entity::user, UserRepository };
use crate::error::Result;

pub struct UserService {
    user_repo: Arc<UserRepository>,
}

impl UserService {
    pub fn new(user_repo: Arc<UserRepository>) -> Self {
        Self { user_repo }
    }

    pub async fn get_user(&self, user_id: i32) -> Result<user::Model> {
        self.user_repo.find_by_id(user_id).await
    }
}
