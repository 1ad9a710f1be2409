use crate::signal::{Memo, Signal};
use std::sync::Arc;

/// A writable view of a [`Signal`] through a pair of transform functions.
///
/// Reading evaluates `to(&source)` with memo caching, so the view always
/// equals the transformed source and only recomputes after the source
/// changes. Writing runs `from(value)` and assigns the result to the
/// source, which notifies the source's own observers.
///
/// The pair is a projection, not a guaranteed round trip: nothing here
/// requires `from(to(x)) == x`. A panic inside `to` or `from` propagates
/// to the caller of [`get`](Projection::get) / [`set`](Projection::set).
///
/// # Examples
///
/// ```
/// use satchel::Signal;
///
/// let celsius = Signal::new(20.0_f64);
/// let fahrenheit = celsius.project(
///     |c| c * 9.0 / 5.0 + 32.0,
///     |f: f64| (f - 32.0) * 5.0 / 9.0,
/// );
///
/// assert_eq!(fahrenheit.get(), 68.0);
///
/// fahrenheit.set(212.0);
/// assert_eq!(celsius.get(), 100.0);
/// ```
pub struct Projection<F, T> {
    source: Signal<F>,
    view: Memo<T>,
    from: Arc<dyn Fn(T) -> F + Send + Sync>,
}

impl<F, T> Clone for Projection<F, T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            view: self.view.clone(),
            from: Arc::clone(&self.from),
        }
    }
}

impl<F, T> Projection<F, T>
where
    F: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Get the transformed value, recomputing if the source changed.
    pub fn get(&self) -> T {
        self.view.get()
    }

    /// Borrow the transformed value without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.view.with(f)
    }

    /// Write through the view: the source becomes `from(value)` and its
    /// observers are notified.
    pub fn set(&self, value: T) {
        self.source.set((self.from)(value));
    }

    /// The underlying source signal.
    pub fn source(&self) -> &Signal<F> {
        &self.source
    }
}

/// Present `source` through the bidirectional transform `(to, from)`.
///
/// See [`Projection`] for the semantics; [`Signal::project`] is the
/// method-call form.
pub fn project<F, T, To, From>(source: &Signal<F>, to: To, from: From) -> Projection<F, T>
where
    F: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
    To: Fn(&F) -> T + Send + Sync + 'static,
    From: Fn(T) -> F + Send + Sync + 'static,
{
    let view = Memo::new({
        let source = source.clone();
        move || source.with(|value| to(value))
    });

    Projection {
        source: source.clone(),
        view,
        from: Arc::new(from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Runtime;

    #[test]
    fn read_is_transformed_source() {
        Runtime::scope(|| {
            let source = Signal::new(21);
            let doubled = project(&source, |n| n * 2, |n: i32| n / 2);

            assert_eq!(doubled.get(), 42);

            source.set(10);
            assert_eq!(doubled.get(), 20);
        });
    }

    #[test]
    fn write_goes_through_from() {
        Runtime::scope(|| {
            let source = Signal::new(String::from("light"));
            let shouting = source.project(
                |s: &String| s.to_uppercase(),
                |s: String| s.to_lowercase(),
            );

            shouting.set(String::from("DARK"));
            assert_eq!(source.get(), "dark");
            assert_eq!(shouting.get(), "DARK");
            assert_eq!(shouting.source().get(), "dark");
        });
    }

    #[test]
    fn cloned_handles_share_the_source() {
        Runtime::scope(|| {
            let source = Signal::new(2);
            let doubled = project(&source, |n| n * 2, |n: i32| n / 2);
            let handle = doubled.clone();

            assert_eq!(handle.get(), 4);

            handle.set(10);
            assert_eq!(source.get(), 5);
            assert_eq!(doubled.get(), 10);
        });
    }

    #[test]
    fn with_borrows_the_view() {
        Runtime::scope(|| {
            let source = Signal::new(vec![1, 2, 3]);
            let len = project(&source, |v: &Vec<i32>| v.len(), |n: usize| vec![0; n]);
            assert_eq!(len.with(|n| *n), 3);
        });
    }

    #[test]
    fn silent_source_write_still_reaches_view() {
        Runtime::scope(|| {
            let source = Signal::new(1);
            let negated = project(&source, |n| -n, |n: i32| -n);
            assert_eq!(negated.get(), -1);

            source.set_silent(7);
            assert_eq!(negated.get(), -7);
        });
    }
}
