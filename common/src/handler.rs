//! [`Handler`] abstractions.

use std::future::Future;

/// Executable handler of an operation described by `Args`.
///
/// Commands, queries and infrastructure calls (transports) are all expressed
/// as [`Handler`]s over their argument types, so a single value may handle
/// many different operations.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
