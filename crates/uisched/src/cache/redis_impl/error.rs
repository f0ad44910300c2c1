use uisched_core::cache::CacheError;

/// Maps a redis error into the cache error taxonomy.
///
/// Connection-level failures are distinguished so the gateway's logs can
/// tell an unreachable Redis apart from a bad command.
pub(crate) fn map_redis_error(err: redis::RedisError) -> CacheError {
    if err.is_connection_refusal() || err.is_connection_dropped() || err.is_timeout() {
        CacheError::ConnectionFailed(err.to_string())
    } else {
        CacheError::OperationFailed(err.to_string())
    }
}
