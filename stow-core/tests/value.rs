#[cfg(test)]
mod tests {
    use std::cmp::Ordering;
    use stow_core::{AsValue, Error, Value, convert_value};
    use time::macros::datetime;

    #[test]
    fn value_none() {
        assert_eq!(Value::Null, Value::Null);
        assert_ne!(Value::Float64(Some(1.0)), Value::Null);
        assert!(Value::Varchar(None).is_null());
        assert!(Value::Int16(None).same_type(&Value::Int16(Some(3))));
        assert!(!Value::Int16(None).same_type(&Value::Int32(None)));
        assert_eq!(Value::Int32(Some(4)).as_null(), Value::Int32(None));
    }

    #[test]
    fn value_bool() {
        let val: Value = true.into();
        assert_eq!(val, Value::Boolean(Some(true)));
        assert_ne!(val, Value::Boolean(None));
        assert_ne!(val, Value::Varchar(Some("true".into())));
        assert!(bool::try_from_value(Value::Int16(Some(8))).unwrap());
        assert!(!bool::try_from_value(Value::Int32(Some(0))).unwrap());
        assert!(matches!(
            bool::try_from_value(Value::Float64(Some(0.5))),
            Err(Error::Conversion(..))
        ));
    }

    #[test]
    fn value_integers() {
        assert_eq!(Value::from(-7i8), Value::Int16(Some(-7)));
        assert_eq!(Value::from(200u8), Value::Int16(Some(200)));
        assert_eq!(Value::from(-32768i16), Value::Int16(Some(-32768)));
        assert_eq!(Value::from(65535u16), Value::Int32(Some(65535)));
        assert_eq!(Value::from(i64::MAX), Value::Int64(Some(i64::MAX)));
        assert_eq!(Value::from(u32::MAX), Value::Int64(Some(u32::MAX as i64)));
        assert_eq!(u8::try_from_value(Value::Int64(Some(255))).unwrap(), 255);
        assert!(u8::try_from_value(Value::Int64(Some(256))).is_err());
        assert!(i8::try_from_value(Value::Int16(Some(-129))).is_err());
        assert!(i32::try_from_value(Value::Float64(Some(1.0))).is_err());
    }

    #[test]
    fn value_float() {
        assert_eq!(Value::from(0.25f32), Value::Float64(Some(0.25)));
        assert_eq!(f64::try_from_value(Value::Int32(Some(3))).unwrap(), 3.0);
        assert_eq!(f32::try_from_value(Value::Float64(Some(-1.5))).unwrap(), -1.5);
        assert!(f32::try_from_value(Value::Int32(Some(3))).is_err());
    }

    #[test]
    fn value_text_and_binary() {
        assert_eq!(Value::from("hello"), Value::Varchar(Some("hello".into())));
        assert_eq!(
            String::try_from_value(Value::Varchar(Some("x".into()))).unwrap(),
            "x"
        );
        let bytes = vec![1u8, 2, 3];
        let val = bytes.clone().as_value();
        assert_eq!(val, Value::Blob(Some(bytes.clone().into_boxed_slice())));
        assert_eq!(Vec::<u8>::try_from_value(val).unwrap(), bytes);
    }

    #[test]
    fn value_timestamp() {
        let moment = datetime!(2024-12-31 23:59:58);
        let val: Value = moment.into();
        assert_eq!(val, Value::Timestamp(Some(moment)));
        assert_eq!(time::PrimitiveDateTime::try_from_value(val).unwrap(), moment);
        assert!(time::PrimitiveDateTime::try_from_value(Value::Varchar(Some("2024".into()))).is_err());
    }

    #[test]
    fn value_option() {
        assert_eq!(Option::<i16>::as_empty_value(), Value::Int16(None));
        assert_eq!(Some(5i32).as_value(), Value::Int32(Some(5)));
        assert_eq!(None::<String>.as_value(), Value::Varchar(None));
        assert_eq!(Option::<i32>::try_from_value(Value::Null).unwrap(), None);
        assert_eq!(Option::<i32>::try_from_value(Value::Int64(None)).unwrap(), None);
        assert_eq!(
            Option::<i32>::try_from_value(Value::Int16(Some(2))).unwrap(),
            Some(2)
        );
    }

    #[test]
    fn ordering() {
        assert_eq!(
            Value::Int16(Some(3)).partial_cmp(&Value::Int64(Some(2))),
            Some(Ordering::Greater)
        );
        assert_eq!(
            Value::Varchar(Some("a".into())).partial_cmp(&Value::Varchar(Some("b".into()))),
            Some(Ordering::Less)
        );
        assert_eq!(Value::Int32(None).partial_cmp(&Value::Int32(Some(1))), None);
        assert_eq!(
            Value::Varchar(Some("1".into())).partial_cmp(&Value::Int32(Some(1))),
            None
        );
    }

    #[test]
    fn display() {
        assert_eq!(Value::Int32(None).to_string(), "NULL");
        assert_eq!(Value::from("rick").to_string(), "'rick'");
        assert_eq!(Value::Blob(Some(vec![0, 1].into_boxed_slice())).to_string(), "<2 bytes>");
        assert_eq!(Value::from(-12i64).to_string(), "-12");
    }

    #[test]
    fn conversion() {
        assert_eq!(
            convert_value(&Value::Int16(None), Value::Int64(Some(12))).unwrap(),
            Value::Int16(Some(12))
        );
        assert_eq!(
            convert_value(&Value::Varchar(None), Value::Null).unwrap(),
            Value::Varchar(None)
        );
        assert_eq!(
            convert_value(&Value::Null, Value::Int32(Some(1))).unwrap(),
            Value::Int32(Some(1))
        );
        assert!(matches!(
            convert_value(&Value::Timestamp(None), Value::Int32(Some(1))),
            Err(Error::Conversion(..))
        ));
    }
}
