use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use auth::Authenticator;
use auth::TokenService;
use chrono::DateTime;
use chrono::Utc;
use serde_json::json;
use serde_json::Value;
use todo_service::domain::todo::errors::TodoError;
use todo_service::domain::todo::models::Todo;
use todo_service::domain::todo::models::TodoId;
use todo_service::domain::todo::ports::TodoRepository;
use todo_service::domain::todo::service::TodoService;
use todo_service::domain::user::errors::UserError;
use todo_service::domain::user::models::EmailAddress;
use todo_service::domain::user::models::User;
use todo_service::domain::user::models::UserId;
use todo_service::domain::user::models::Username;
use todo_service::domain::user::ports::UserRepository;
use todo_service::domain::user::service::AuthenticationService;
use todo_service::inbound::http::router::create_router;
use uuid::Uuid;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server over in-memory storage
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub token_service: TokenService,
    pub users: Arc<InMemoryUserRepository>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let users = Arc::new(InMemoryUserRepository::default());
        let todos = Arc::new(InMemoryTodoRepository::new(Arc::clone(&users)));

        let authenticator = Arc::new(Authenticator::new(
            TokenService::new(TEST_SECRET, chrono::Duration::hours(24))
                .expect("Failed to create token service"),
        ));

        let auth_service = Arc::new(AuthenticationService::new(
            Arc::clone(&users),
            Arc::clone(&authenticator),
        ));
        let todo_service = Arc::new(TodoService::new(todos));

        let router = create_router(
            auth_service,
            todo_service,
            authenticator,
            Duration::from_secs(30),
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            token_service: TokenService::new(TEST_SECRET, chrono::Duration::hours(24))
                .expect("Failed to create token service"),
            users,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register a user and return the `data` object of the response
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Value {
        let response = self
            .post("/auth/register")
            .json(&json!({
                "username": username,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"].clone()
    }

    /// Log in and return the bearer token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post("/auth/login")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Missing token")
            .to_string()
    }

    /// Register then log in, returning the token
    pub async fn signup(&self, username: &str) -> String {
        let email = format!("{}@example.com", username);
        self.register(username, &email, "pass_word!").await;
        self.login(username, "pass_word!").await
    }

    /// Create a todo as the token's owner and return its id
    pub async fn create_todo(&self, token: &str, title: &str) -> String {
        let response = self
            .post_authenticated("/todos", token)
            .json(&json!({ "title": title }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["id"].as_str().expect("Missing id").to_string()
    }
}

/// User storage with the same uniqueness rules as the users table
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn contains(&self, id: &UserId) -> bool {
        self.users.lock().unwrap().contains_key(&id.0)
    }

    pub fn remove(&self, id: &UserId) {
        self.users.lock().unwrap().remove(&id.0);
    }

    fn check_unique(users: &HashMap<Uuid, User>, user: &User) -> Result<(), UserError> {
        for other in users.values().filter(|u| u.id != user.id) {
            if other.username == user.username {
                return Err(UserError::UsernameAlreadyExists(
                    user.username.as_str().to_string(),
                ));
            }
            if other.email == user.email {
                return Err(UserError::EmailAlreadyExists(user.email.as_str().to_string()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        Self::check_unique(&users, &user)?;
        users.insert(user.id.0, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.lock().unwrap().get(&id.0).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| &u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        if !users.contains_key(&user.id.0) {
            return Err(UserError::NotFound(user.id.to_string()));
        }
        Self::check_unique(&users, &user)?;
        users.insert(user.id.0, user.clone());
        Ok(user)
    }

    async fn exists_by_username(&self, username: &Username) -> Result<bool, UserError> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, UserError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}

/// Todo storage that keeps soft-deleted rows and enforces the owner reference
pub struct InMemoryTodoRepository {
    users: Arc<InMemoryUserRepository>,
    todos: Mutex<HashMap<Uuid, Todo>>,
}

impl InMemoryTodoRepository {
    pub fn new(users: Arc<InMemoryUserRepository>) -> Self {
        Self {
            users,
            todos: Mutex::new(HashMap::new()),
        }
    }

    fn live(&self, id: &TodoId) -> Option<Todo> {
        self.todos
            .lock()
            .unwrap()
            .get(&id.0)
            .filter(|t| !t.is_deleted())
            .cloned()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn create(&self, todo: Todo) -> Result<Todo, TodoError> {
        if !self.users.contains(&todo.owner_id) {
            return Err(TodoError::OwnerNotFound(todo.owner_id));
        }
        self.todos.lock().unwrap().insert(todo.id.0, todo.clone());
        Ok(todo)
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, TodoError> {
        Ok(self.live(id))
    }

    async fn find_by_owner(&self, owner_id: &UserId) -> Result<Vec<Todo>, TodoError> {
        let mut todos: Vec<Todo> = self
            .todos
            .lock()
            .unwrap()
            .values()
            .filter(|t| !t.is_deleted() && &t.owner_id == owner_id)
            .cloned()
            .collect();
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(todos)
    }

    async fn update(&self, todo: Todo) -> Result<Todo, TodoError> {
        if self.live(&todo.id).is_none() {
            return Err(TodoError::NotFound(todo.id));
        }
        self.todos.lock().unwrap().insert(todo.id.0, todo.clone());
        Ok(todo)
    }

    async fn soft_delete(&self, id: &TodoId, deleted_at: DateTime<Utc>) -> Result<(), TodoError> {
        let mut todos = self.todos.lock().unwrap();
        match todos.get_mut(&id.0).filter(|t| !t.is_deleted()) {
            Some(todo) => {
                todo.deleted_at = Some(deleted_at);
                Ok(())
            }
            None => Err(TodoError::NotFound(*id)),
        }
    }

    async fn is_owned_by(
        &self,
        id: &TodoId,
        owner_id: &UserId,
    ) -> Result<Option<bool>, TodoError> {
        Ok(self.live(id).map(|t| &t.owner_id == owner_id))
    }
}
