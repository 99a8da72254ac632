//! Ledger store access.
//!
//! Reads go through [`LedgerRead`]. Writes are staged in a [`UnitOfWork`] and
//! reach persistent storage only on [`UnitOfWork::commit`]; a unit of work
//! that is rolled back (or dropped) leaves storage and the event stream
//! untouched. Activity and notification events are published after the last
//! row is written.

use common::ttl;
use soroban_sdk::{Address, Env, IntoVal, Map, TryFromVal, Val, Vec};

use crate::errors::ContractError;
use crate::events;
use crate::types::{
    Activity, ActivityKind, DataKey, Notification, NotificationKind, Table, User,
};

pub trait LedgerRead {
    fn env(&self) -> &Env;

    fn load<V: TryFromVal<Env, Val>>(&self, key: &DataKey) -> Result<Option<V>, ContractError>;

    fn exists(&self, key: &DataKey) -> bool;

    fn now(&self) -> u64 {
        self.env().ledger().timestamp()
    }

    /// Loads a row that must exist.
    fn fetch<V: TryFromVal<Env, Val>>(&self, key: &DataKey) -> Result<V, ContractError> {
        self.load(key)?.ok_or(ContractError::NotFound)
    }

    /// Loads an id index, empty when absent.
    fn ids(&self, key: &DataKey) -> Result<Vec<u64>, ContractError> {
        Ok(self.load(key)?.unwrap_or(Vec::new(self.env())))
    }

    fn user(&self, address: &Address) -> Result<User, ContractError> {
        self.fetch(&DataKey::User(address.clone()))
    }
}

/// Read-only view of committed state.
pub struct Snapshot<'a> {
    env: &'a Env,
}

impl<'a> Snapshot<'a> {
    pub fn new(env: &'a Env) -> Self {
        Self { env }
    }
}

impl LedgerRead for Snapshot<'_> {
    fn env(&self) -> &Env {
        self.env
    }

    fn load<V: TryFromVal<Env, Val>>(&self, key: &DataKey) -> Result<Option<V>, ContractError> {
        Ok(self.env.storage().persistent().get(key))
    }

    fn exists(&self, key: &DataKey) -> bool {
        self.env.storage().persistent().has(key)
    }
}

/// Staged set of ledger mutations that commit or roll back together.
pub struct UnitOfWork<'a> {
    env: &'a Env,
    writes: Map<DataKey, Val>,
    removals: Map<DataKey, bool>,
    activities: Vec<Activity>,
    notifications: Vec<Notification>,
}

impl<'a> UnitOfWork<'a> {
    pub fn begin(env: &'a Env) -> Self {
        Self {
            env,
            writes: Map::new(env),
            removals: Map::new(env),
            activities: Vec::new(env),
            notifications: Vec::new(env),
        }
    }

    pub fn store<V: IntoVal<Env, Val>>(&mut self, key: DataKey, value: &V) {
        self.removals.remove(key.clone());
        self.writes.set(key, value.into_val(self.env));
    }

    pub fn remove(&mut self, key: DataKey) {
        self.writes.remove(key.clone());
        self.removals.set(key, true);
    }

    /// Allocates the next id of `table`. Ids start at 1.
    pub fn next_id(&mut self, table: Table) -> Result<u64, ContractError> {
        let key = DataKey::NextId(table);
        let current: u64 = self.load(&key)?.unwrap_or(0);
        let next = current
            .checked_add(1)
            .ok_or(ContractError::ArithmeticOverflow)?;
        self.store(key, &next);
        Ok(next)
    }

    /// Appends `id` to the index stored under `key`.
    pub fn push_id(&mut self, key: DataKey, id: u64) -> Result<(), ContractError> {
        let mut ids = self.ids(&key)?;
        ids.push_back(id);
        self.store(key, &ids);
        Ok(())
    }

    pub fn save_user(&mut self, user: &User) {
        self.store(DataKey::User(user.address.clone()), user);
    }

    /// Adds `delta` (which may be negative) to a user's balance. The balance
    /// never goes below zero.
    pub fn adjust_balance(&mut self, address: &Address, delta: i128) -> Result<User, ContractError> {
        let mut user = self.user(address)?;
        let balance = user
            .balance
            .checked_add(delta)
            .ok_or(ContractError::ArithmeticOverflow)?;
        if balance < 0 {
            return Err(ContractError::InsufficientBalance);
        }
        user.balance = balance;
        self.save_user(&user);
        Ok(user)
    }

    pub fn record_activity(
        &mut self,
        user: &Address,
        kind: ActivityKind,
        amount: i128,
        ref_id: u64,
    ) -> Result<Activity, ContractError> {
        let id = self.next_id(Table::Activity)?;
        let activity = Activity {
            id,
            user: user.clone(),
            kind,
            amount,
            ref_id,
            created_at: self.now(),
        };
        self.store(DataKey::Activity(id), &activity);
        self.activities.push_back(activity.clone());
        Ok(activity)
    }

    pub fn notify(
        &mut self,
        user: &Address,
        kind: NotificationKind,
        amount: i128,
        ref_id: u64,
    ) -> Result<Notification, ContractError> {
        let id = self.next_id(Table::Notification)?;
        let notification = Notification {
            id,
            user: user.clone(),
            kind,
            amount,
            ref_id,
            created_at: self.now(),
        };
        self.store(DataKey::Notification(id), &notification);
        self.push_id(DataKey::UserNotifications(user.clone()), id)?;
        self.notifications.push_back(notification.clone());
        Ok(notification)
    }

    /// Writes every staged row, then publishes the staged events.
    pub fn commit(self) {
        let storage = self.env.storage().persistent();
        for (key, value) in self.writes.iter() {
            storage.set(&key, &value);
            ttl::extend_persistent(self.env, &key);
        }
        for (key, _) in self.removals.iter() {
            storage.remove(&key);
        }
        ttl::extend_instance(self.env);

        for activity in self.activities.iter() {
            events::publish_activity(self.env, &activity);
        }
        for notification in self.notifications.iter() {
            events::publish_notification(self.env, &notification);
        }
    }

    /// Discards every staged write and event.
    pub fn rollback(self) {}
}

impl LedgerRead for UnitOfWork<'_> {
    fn env(&self) -> &Env {
        self.env
    }

    fn load<V: TryFromVal<Env, Val>>(&self, key: &DataKey) -> Result<Option<V>, ContractError> {
        if self.removals.contains_key(key.clone()) {
            return Ok(None);
        }
        match self.writes.get(key.clone()) {
            Some(raw) => V::try_from_val(self.env, &raw)
                .map(Some)
                .map_err(|_| ContractError::StorageError),
            None => Ok(self.env.storage().persistent().get(key)),
        }
    }

    fn exists(&self, key: &DataKey) -> bool {
        if self.removals.contains_key(key.clone()) {
            return false;
        }
        self.writes.contains_key(key.clone()) || self.env.storage().persistent().has(key)
    }
}
