/// Generates the boilerplate operator impls for single-field newtypes.
#[macro_export]
macro_rules! op {
    (binary $ty:ty, $op:ident, $method:ident) => {
        impl $op for $ty {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self::Output {
                Self($op::$method(self.0, rhs.0))
            }
        }
    };
    (inplace $ty:ty, $op:ident, $method:ident) => {
        impl $op for $ty {
            fn $method(&mut self, rhs: Self) {
                $op::$method(&mut self.0, rhs.0)
            }
        }
    };
    (unary $ty:ty, $op:ident, $method:ident) => {
        impl $op for $ty {
            type Output = Self;

            fn $method(self) -> Self::Output {
                Self($op::$method(self.0))
            }
        }
    };
}
