/// Platform visibility mechanism (intersection observer, layout pass, etc).
///
/// A source is told which visual handles to watch. It reports back by feeding
/// visible fractions into the core's intersection tracker; how it gets those
/// numbers is its own business.
pub trait VisibilitySource {
    /// Platform handle for a mounted item (element ref, widget id, ...).
    type Handle;

    fn observe(&mut self, index: usize, handle: &Self::Handle);

    /// Stop watching `index`. Must tolerate indices that were never observed.
    fn unobserve(&mut self, index: usize);
}
