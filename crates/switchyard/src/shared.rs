//! Shared router for registration after startup
//!
//! Resolution takes a read lock and returns an owned [`ResolvedRoute`], so
//! no guard outlives the call. Registration takes the write lock.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::{Params, RouteId, Router};

/// Owned copy of a successful match
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoute<H> {
    pub id: RouteId,
    pub template: String,
    pub handler: H,
    pub params: Params,
}

/// Cloneable handle to a reader-writer guarded [`Router`]
///
/// ```
/// use switchyard::SharedRouter;
///
/// let router = SharedRouter::default();
/// router.register(|r| r.add("/users/{id:int}", "users.show")).unwrap();
///
/// let resolved = router.resolve("/users/5").unwrap();
/// assert_eq!(resolved.handler, "users.show");
/// assert_eq!(resolved.params["id"], "5");
/// ```
#[derive(Debug)]
pub struct SharedRouter<H> {
    inner: Arc<RwLock<Router<H>>>,
}

impl<H> SharedRouter<H> {
    pub fn new(router: Router<H>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(router)),
        }
    }

    /// Runs `f` with exclusive access to the router
    pub fn register<T>(&self, f: impl FnOnce(&mut Router<H>) -> T) -> T {
        let mut router = self.inner.write();
        f(&mut router)
    }

    /// Runs `f` against a consistent snapshot of the router
    pub fn read<T>(&self, f: impl FnOnce(&Router<H>) -> T) -> T {
        let router = self.inner.read();
        f(&router)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

impl<H: Clone> SharedRouter<H> {
    /// Matches `path` under the read lock
    pub fn resolve(&self, path: &str) -> Option<ResolvedRoute<H>> {
        let router = self.inner.read();
        let result = router.match_path(path);
        let route = result.route()?;
        Some(ResolvedRoute {
            id: route.id(),
            template: route.template().to_string(),
            handler: route.handler().clone(),
            params: result.into_params(),
        })
    }
}

impl<H> Clone for SharedRouter<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H> Default for SharedRouter<H> {
    fn default() -> Self {
        Self::new(Router::new())
    }
}

impl<H> From<Router<H>> for SharedRouter<H> {
    fn from(router: Router<H>) -> Self {
        Self::new(router)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::thread;

    #[test]
    fn test_concurrent_resolution() {
        let router = SharedRouter::default();
        router.register(|r| {
            r.add("/docs/*", "docs.any").unwrap();
            r.add("/docs/special", "docs.special").unwrap();
            r.add_with_priority("/items/{id:int}", "items.show", 5).unwrap();
        });

        let workers: Vec<_> = (0..8)
            .map(|n| {
                let router = router.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        let special = router.resolve("/docs/special").unwrap();
                        assert_eq!(special.handler, "docs.special");
                        let item = router.resolve(&format!("/items/{}", n)).unwrap();
                        assert_eq!(item.params["id"], n.to_string());
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }
    }

    #[test]
    fn test_late_registration_is_visible() {
        let router: SharedRouter<&str> = SharedRouter::default();
        assert!(router.resolve("/late").is_none());

        let writer = router.clone();
        thread::spawn(move || writer.register(|r| r.add("/late", "late")).unwrap())
            .join()
            .unwrap();

        let resolved = router.resolve("/late").unwrap();
        assert_eq!(resolved.template, "/late");
        assert_eq!(router.len(), 1);
    }

    #[test]
    fn test_read_snapshot() {
        let router = SharedRouter::from(Router::<()>::new());
        assert!(router.read(|r| r.has_validator("int")));
        assert!(router.is_empty());
    }
}
