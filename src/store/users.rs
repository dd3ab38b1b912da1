use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::{EntityKind, NewUser, User, UserId};

use super::{Store, Tables};

impl Tables {
    /// Checks a candidate user against the uniqueness constraints.
    ///
    /// Usernames are compared exactly; emails ignore case.
    fn check_user_unique(&self, username: &str, email: &str) -> StoreResult<()> {
        if self.users.find(|u| u.username == username).is_some() {
            return Err(StoreError::Conflict {
                kind: EntityKind::User,
                field: "username",
                value: username.to_string(),
            });
        }

        let email_key = email.to_lowercase();
        if self
            .users
            .find(|u| u.email.to_lowercase() == email_key)
            .is_some()
        {
            return Err(StoreError::Conflict {
                kind: EntityKind::User,
                field: "email",
                value: email.to_string(),
            });
        }

        Ok(())
    }
}

impl Store {
    /// Registers a new user.
    ///
    /// Fails with [`StoreError::Conflict`] if the username is taken or the
    /// email is already registered in any casing.
    pub fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write();
        tables.check_user_unique(&new_user.username, &new_user.email)?;

        let id = UserId::new(self.ids.next_id(EntityKind::User));
        let user = User {
            id,
            username: new_user.username,
            email: new_user.email,
            password_credential: new_user.password_credential,
        };
        tables.users.put(id, user.clone());

        debug!(user_id = %id, username = %user.username, "created user");
        Ok(user)
    }

    pub fn get_user(&self, id: UserId) -> Option<User> {
        self.tables.read().users.get(id).cloned()
    }

    pub fn find_user_by_username(&self, username: &str) -> Option<User> {
        self.tables
            .read()
            .users
            .find(|u| u.username == username)
            .cloned()
    }

    /// Looks up a user by email, ignoring case.
    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        let key = email.to_lowercase();
        self.tables
            .read()
            .users
            .find(|u| u.email.to_lowercase() == key)
            .cloned()
    }

    /// Returns every user ordered by id.
    pub fn list_users(&self) -> Vec<User> {
        let mut users = self.tables.read().users.list_where(|_| true);
        users.sort_by_key(|u| u.id);
        users
    }

    /// Loads users with their original ids, e.g. from a snapshot.
    ///
    /// Either every user is restored or none is: a user whose id, username
    /// or email collides with an existing row fails the whole batch with
    /// [`StoreError::Conflict`]. The allocator is advanced past the highest
    /// restored id so new registrations never reuse one.
    pub fn restore_users(&self, users: Vec<User>) -> StoreResult<usize> {
        let mut tables = self.tables.write();

        let mut staged = Tables::default();
        for user in &users {
            if tables.users.contains(user.id) || staged.users.contains(user.id) {
                return Err(StoreError::Conflict {
                    kind: EntityKind::User,
                    field: "id",
                    value: user.id.to_string(),
                });
            }
            tables.check_user_unique(&user.username, &user.email)?;
            staged.check_user_unique(&user.username, &user.email)?;
            staged.users.put(user.id, user.clone());
        }

        let count = users.len();
        for user in users {
            self.ids.observe(EntityKind::User, user.id.get());
            tables.users.put(user.id, user);
        }

        info!(count, "restored users");
        Ok(count)
    }
}
