//! Core contract tests

use crate::{
    DeviceError, LbaasError, Pool, PoolLookup, PoolLookupError, Protocol, RequestContext,
    StaticPoolLookup,
};

fn test_pool(id: &str) -> Pool {
    Pool::new(id.to_string(), "ten1".to_string(), Protocol::Http)
}

#[tokio::test]
async fn test_static_pool_lookup() {
    let lookup = StaticPoolLookup::with_pools(vec![test_pool("pool1"), test_pool("pool2")]);
    let context = RequestContext::new();

    let pool = lookup.get_pool(&context, "pool1").await.unwrap();
    assert_eq!(pool.id, "pool1");
    assert_eq!(pool.protocol, Protocol::Http);

    lookup.remove("pool1");
    let err = lookup.get_pool(&context, "pool1").await.unwrap_err();
    assert!(matches!(err, PoolLookupError::NotFound { ref pool_id } if pool_id == "pool1"));
}

#[test]
fn test_request_context_ids_are_unique() {
    let a = RequestContext::new();
    let b = RequestContext::for_tenant("ten1");

    assert_ne!(a.request_id, b.request_id);
    assert_eq!(b.tenant_id.as_deref(), Some("ten1"));
}

#[test]
fn test_error_conversions() {
    let err: LbaasError = PoolLookupError::NotFound {
        pool_id: "pool9".to_string(),
    }
    .into();
    assert!(matches!(err, LbaasError::Precondition(_)));
    assert!(err.to_string().contains("pool9"));

    let err: LbaasError = DeviceError::Communication {
        device: "ax1".to_string(),
        message: "connection reset".to_string(),
    }
    .into();
    assert!(matches!(err, LbaasError::Device(_)));
    assert!(!err.is_unsupported());
}
