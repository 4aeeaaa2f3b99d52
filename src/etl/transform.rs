//! Transformer trait for reshaping records

use eyre::Result;

/// Transformer trait for transforming records one at a time
///
/// Implementors define how to reshape items:
/// - Decoding store-tagged values into plain JSON
/// - Joining legacy accounts against exported identities
///
/// # Example
/// ```no_run
/// use source_migrate::etl::Transformer;
/// use eyre::Result;
///
/// struct Lowercase;
///
/// impl Transformer for Lowercase {
///     type Input = String;
///     type Output = String;
///
///     fn transform(&self, input: Self::Input) -> Result<Self::Output> {
///         Ok(input.to_lowercase())
///     }
/// }
/// ```
pub trait Transformer: Send + Sync {
    /// Input item type
    type Input: Send;

    /// Output item type after transformation
    type Output: Send;

    /// Transform a single item
    ///
    /// # Errors
    /// Returns an error if the item cannot be reshaped (missing field, bad encoding, etc.)
    fn transform(&self, input: Self::Input) -> Result<Self::Output>;

    /// Transform multiple items, failing on the first bad one
    fn transform_many(&self, inputs: Vec<Self::Input>) -> Result<Vec<Self::Output>> {
        inputs.into_iter().map(|i| self.transform(i)).collect()
    }
}

/// Transformer that hands items through unchanged
///
/// Used by jobs whose records need no reshaping between source and sink,
/// such as loading already-transformed dump files into DynamoDB.
pub struct Passthrough<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Passthrough<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T> Passthrough<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: Send + Sync> Transformer for Passthrough<T> {
    type Input = T;
    type Output = T;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailOnNegative;

    impl Transformer for FailOnNegative {
        type Input = i32;
        type Output = i32;

        fn transform(&self, input: Self::Input) -> Result<Self::Output> {
            if input < 0 {
                eyre::bail!("negative input: {}", input);
            }
            Ok(input)
        }
    }

    #[test]
    fn test_passthrough() {
        let transformer = Passthrough::<i32>::new();
        let input = vec![1, 2, 3];
        let output = transformer.transform_many(input.clone()).unwrap();
        assert_eq!(input, output);
    }

    #[test]
    fn test_transform_many_fails_fast() {
        let result = FailOnNegative.transform_many(vec![1, -2, 3]);
        assert!(result.unwrap_err().to_string().contains("negative input: -2"));
    }
}
