macro_rules! setter {
    ($field:ident : $ty:ty) => {
        pub fn $field<V>(mut self, $field: V) -> Self
        where
            V: Into<$ty>,
        {
            self.$field = $field.into();
            self
        }
    };

    (opt $field:ident : $ty:ty) => {
        pub fn $field<V>(mut self, $field: V) -> Self
        where
            V: Into<$ty>,
        {
            self.$field = std::option::Option::Some($field.into());
            self
        }
    };

    (opt $field:ident . $subfield:ident : $ty:ty) => {
        pub fn $subfield<V>(mut self, $subfield: V) -> Self
        where
            V: Into<$ty>,
        {
            self.$field.$subfield = Some($subfield.into());
            self
        }
    };
}

pub(crate) use setter;
