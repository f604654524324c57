macro_rules! primitive_kinds {
    (
        $( $variant:ident => $name:literal $( [$numeric:ident] )? ),* $(,)?
    ) => {
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        pub enum PrimitiveKind {
            $( $variant, )*
        }

        impl PrimitiveKind {
            pub const ALL: &'static [PrimitiveKind] = &[ $( PrimitiveKind::$variant, )* ];

            pub fn name(self) -> &'static str {
                match self {
                    $( PrimitiveKind::$variant => $name, )*
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $( $name => Some(PrimitiveKind::$variant), )*
                    _ => None,
                }
            }

            /// Byte, short, int, long, float and double. Boolean, char and void are not numbers.
            pub fn is_numeric(self) -> bool {
                match self {
                    $( PrimitiveKind::$variant => primitive_kinds!(@numeric $( $numeric )?), )*
                }
            }
        }

        impl std::fmt::Display for PrimitiveKind {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
    (@numeric numeric) => { true };
    (@numeric) => { false };
}
