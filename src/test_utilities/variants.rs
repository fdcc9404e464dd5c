#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Locking,
    LockFree,
}

impl Variant {
    pub const ALL: &'static [Variant; 2] = &[Variant::Locking, Variant::LockFree];
}

// Each gate strategy is its own type, so the code under test has to
// be instantiated once per strategy. `$gate` names the strategy's
// type constructor inside `$code`.
#[macro_export]
#[doc(hidden)]
macro_rules! test_with_gate_variants {
    ($variant:expr, $gate:ident, $code:block) => {
        match $variant {
            $crate::test_utilities::variants::Variant::Locking => {
                #[allow(dead_code)]
                type $gate<P> = $crate::gate::LockingGate<P>;
                $code
            }
            $crate::test_utilities::variants::Variant::LockFree => {
                #[allow(dead_code)]
                type $gate<P> = $crate::gate::LockFreeGate<P>;
                $code
            }
        }
    };
}
