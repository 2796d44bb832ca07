diesel::table! {
    products (id) {
        id -> Integer,
        name -> Text,
        description -> Nullable<Text>,
        price -> Text,
        category -> Text,
        image -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        name_zh -> Nullable<Text>,
        name_en -> Nullable<Text>,
        description_zh -> Nullable<Text>,
        description_en -> Nullable<Text>,
    }
}
