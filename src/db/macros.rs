/// Read-through caching for fallible async fetches.
///
/// Returns the cached value when present. Otherwise awaits `$block`, propagates its error
/// with `?` (so failures are never cached), queues the value for a background write with
/// the given TTL in seconds, and returns it.
///
/// Must be used inside a function returning `AppResult<T>`.
///
/// # Example
/// ```rust,ignore
/// cached!(self.cache, CacheKey::VideoFiles(id.to_string()), FILES_CACHE_TTL, async move {
///     self.fetch_files(id).await
/// })
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        if let Some(cached) = $cache.get_from_cache(&key).await {
            tracing::debug!(key = %key, "Cache hit");
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&key, &value, $ttl);
            Ok(value)
        }
    }};
}
