//! Staged, all-or-nothing writes over a [`Store`].
//!
//! A [`UnitOfWork`] collects entities and hands them to
//! [`Store::apply`] on commit. A [`NestedUnit`] opened from it has its own
//! boundary: committing merges its writes into the parent, dropping or
//! rolling it back discards them. Lookups see the store plus everything
//! staged in enclosing units, so entities added earlier in the same unit
//! count as existing.

use tracing::debug;

use crate::error::{AgoraError, AgoraResult};
use crate::repository::{Persistable, Record, Store};

pub struct UnitOfWork<'s, S: Store> {
    store: &'s S,
    staged: Vec<Record>,
}

impl<'s, S: Store> UnitOfWork<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            staged: Vec::new(),
        }
    }

    /// Stage `entity`, failing with `AlreadyExists` if its key is taken.
    pub async fn add<E: Persistable>(&mut self, entity: E) -> AgoraResult<E> {
        if let Some(err) = conflict(self.store, &[&self.staged], &entity).await? {
            return Err(err);
        }
        self.staged.push(entity.clone().into_record());
        Ok(entity)
    }

    /// Stage `entity` unless an entity with the same key exists, in which
    /// case the existing one is returned. The flag tells whether `entity`
    /// was staged.
    pub async fn add_if_absent<E: Persistable>(&mut self, entity: E) -> AgoraResult<(E, bool)> {
        if let Some(existing) = existing(self.store, &[&self.staged], &entity).await? {
            return Ok((existing, false));
        }
        self.staged.push(entity.clone().into_record());
        Ok((entity, true))
    }

    /// Open a nested unit whose writes can be discarded on their own.
    pub fn begin_nested(&mut self) -> NestedUnit<'_, 's, S> {
        NestedUnit {
            parent: self,
            staged: Vec::new(),
        }
    }

    /// Records staged so far, in insertion order.
    pub fn staged(&self) -> &[Record] {
        &self.staged
    }

    /// Write every staged record in one store transaction.
    pub async fn commit(self) -> AgoraResult<()> {
        if self.staged.is_empty() {
            return Ok(());
        }
        debug!(records = self.staged.len(), "Committing unit of work");
        self.store.apply(self.staged).await
    }

    /// Discard every staged record.
    pub fn rollback(self) {
        debug!(records = self.staged.len(), "Rolling back unit of work");
    }
}

/// A sub-unit of a [`UnitOfWork`].
pub struct NestedUnit<'p, 's, S: Store> {
    parent: &'p mut UnitOfWork<'s, S>,
    staged: Vec<Record>,
}

impl<S: Store> NestedUnit<'_, '_, S> {
    pub async fn add<E: Persistable>(&mut self, entity: E) -> AgoraResult<E> {
        let layers: [&[Record]; 2] = [&self.parent.staged, &self.staged];
        if let Some(err) = conflict(self.parent.store, &layers, &entity).await? {
            return Err(err);
        }
        self.staged.push(entity.clone().into_record());
        Ok(entity)
    }

    pub async fn add_if_absent<E: Persistable>(&mut self, entity: E) -> AgoraResult<(E, bool)> {
        let layers: [&[Record]; 2] = [&self.parent.staged, &self.staged];
        if let Some(existing) = existing(self.parent.store, &layers, &entity).await? {
            return Ok((existing, false));
        }
        self.staged.push(entity.clone().into_record());
        Ok((entity, true))
    }

    /// Merge the nested writes into the parent unit.
    pub fn commit(self) {
        self.parent.staged.extend(self.staged);
    }

    /// Discard the nested writes; the parent is unchanged.
    pub fn rollback(self) {
        debug!(records = self.staged.len(), "Rolling back nested unit");
    }
}

async fn lookup<S: Store, E: Persistable>(
    store: &S,
    layers: &[&[Record]],
    entity: &E,
) -> AgoraResult<Option<Record>> {
    let key = entity.unique_key();
    let staged = layers
        .iter()
        .flat_map(|layer| layer.iter())
        .find(|record| record.unique_key() == key);
    match staged {
        Some(record) => Ok(Some(record.clone())),
        None => store.find(&key).await,
    }
}

async fn conflict<S: Store, E: Persistable>(
    store: &S,
    layers: &[&[Record]],
    entity: &E,
) -> AgoraResult<Option<AgoraError>> {
    let key = entity.unique_key();
    Ok(lookup(store, layers, entity)
        .await?
        .map(|_| AgoraError::AlreadyExists {
            entity: key.entity().into(),
            key: key.to_string(),
        }))
}

async fn existing<S: Store, E: Persistable>(
    store: &S,
    layers: &[&[Record]],
    entity: &E,
) -> AgoraResult<Option<E>> {
    let Some(record) = lookup(store, layers, entity).await? else {
        return Ok(None);
    };
    let key = entity.unique_key();
    debug!(entity = key.entity(), key = %key, "Reusing existing entity");
    E::from_record(record).map(Some).ok_or_else(|| {
        AgoraError::Internal(format!("store returned a different entity kind for {key}"))
    })
}
