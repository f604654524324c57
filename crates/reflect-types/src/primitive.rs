primitive_kinds! {
    Boolean => "boolean",
    Char => "char",
    Byte => "byte" [numeric],
    Short => "short" [numeric],
    Int => "int" [numeric],
    Long => "long" [numeric],
    Float => "float" [numeric],
    Double => "double" [numeric],
    Void => "void",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(PrimitiveKind::from_name(kind.name()), Some(*kind));
        }
        assert_eq!(PrimitiveKind::from_name("Integer"), None);
    }

    #[test]
    fn test_numeric_kinds() {
        let numeric: Vec<_> = PrimitiveKind::ALL
            .iter()
            .copied()
            .filter(|k| k.is_numeric())
            .collect();
        assert_eq!(
            numeric,
            vec![
                PrimitiveKind::Byte,
                PrimitiveKind::Short,
                PrimitiveKind::Int,
                PrimitiveKind::Long,
                PrimitiveKind::Float,
                PrimitiveKind::Double,
            ]
        );
    }
}
