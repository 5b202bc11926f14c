use crate::domain::ports::RemoteSource;
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    Remote,
    Fixture,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    pub data: T,
    pub origin: DataOrigin,
}

/// Live data first, built-in fixture when the live source has nothing.
pub struct FallbackRepository<R, D> {
    remote: R,
    fixture: Box<dyn Fn() -> D + Send + Sync>,
    fallback_on_error: bool,
}

impl<R, D> FallbackRepository<R, D> {
    pub fn new(remote: R, fixture: impl Fn() -> D + Send + Sync + 'static) -> Self {
        Self {
            remote,
            fixture: Box::new(fixture),
            fallback_on_error: false,
        }
    }

    /// Also use the fixture when the remote call itself fails.
    pub fn with_fallback_on_error(mut self, enabled: bool) -> Self {
        self.fallback_on_error = enabled;
        self
    }

    pub fn default_fixture(&self) -> D {
        (self.fixture)()
    }

    pub async fn load<K>(&self, key: &K) -> Result<Sourced<D>>
    where
        K: ?Sized + Sync,
        R: RemoteSource<K, Data = D>,
    {
        match self.remote.fetch(key).await {
            Ok(Some(data)) => Ok(Sourced {
                data,
                origin: DataOrigin::Remote,
            }),
            Ok(None) => {
                tracing::warn!("No data from API, using built-in fixture");
                Ok(self.fixture_data())
            }
            Err(e) if self.fallback_on_error => {
                tracing::warn!("API request failed ({}), using built-in fixture", e);
                Ok(self.fixture_data())
            }
            Err(e) => Err(e),
        }
    }

    fn fixture_data(&self) -> Sourced<D> {
        Sourced {
            data: self.default_fixture(),
            origin: DataOrigin::Fixture,
        }
    }
}
