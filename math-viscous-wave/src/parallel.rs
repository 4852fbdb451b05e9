//! Parallel utilities with feature-gated implementations
//!
//! With the `parallel` feature (default) grid points are mapped through
//! rayon's global pool; without it the same helpers run sequentially.

/// Check if parallel processing is available
#[cfg(feature = "parallel")]
pub fn is_parallel_available() -> bool {
    true
}

/// Check if parallel processing is available
#[cfg(not(feature = "parallel"))]
pub fn is_parallel_available() -> bool {
    false
}

/// Number of worker threads a parallel sweep will use
#[cfg(feature = "parallel")]
pub fn worker_count() -> usize {
    rayon::current_num_threads()
}

/// Number of worker threads a parallel sweep will use
#[cfg(not(feature = "parallel"))]
pub fn worker_count() -> usize {
    1
}

/// Fallible parallel map over `0..count`, results in index order
#[cfg(feature = "parallel")]
pub fn parallel_try_map_indexed<U, E, F>(count: usize, f: F) -> Result<Vec<U>, E>
where
    U: Send,
    E: Send,
    F: Fn(usize) -> Result<U, E> + Sync + Send,
{
    use rayon::prelude::*;
    (0..count).into_par_iter().map(f).collect()
}

/// Fallible sequential map with index (fallback)
#[cfg(not(feature = "parallel"))]
pub fn parallel_try_map_indexed<U, E, F>(count: usize, f: F) -> Result<Vec<U>, E>
where
    F: Fn(usize) -> Result<U, E>,
{
    (0..count).map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_order() {
        let out: Result<Vec<usize>, String> = parallel_try_map_indexed(100, |i| Ok(i * i));
        let out = out.unwrap();
        assert_eq!(out.len(), 100);
        assert!(out.iter().enumerate().all(|(i, &v)| v == i * i));
    }

    #[test]
    fn test_propagates_error() {
        let out: Result<Vec<usize>, String> = parallel_try_map_indexed(50, |i| {
            if i == 17 {
                Err(format!("bad index {i}"))
            } else {
                Ok(i)
            }
        });
        assert_eq!(out.unwrap_err(), "bad index 17");
    }

    #[test]
    fn test_worker_count() {
        assert!(worker_count() >= 1);
        assert_eq!(is_parallel_available(), cfg!(feature = "parallel"));
    }
}
