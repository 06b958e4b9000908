//! Shared schema fixture for binder tests.
//!
//! One deliberately small commerce model exercising every shape the
//! binders care about: base/derived entities, nested complex types, a
//! self-referential navigation, an open type, a stream property, and
//! navigation sources with partial binding tables.

use crate::model::{Model, NavigationSource, PrimitiveKind, Property, StructuredType, TypeRef};

pub fn sample_model() -> Model {
    Model::builder()
        .structured_type(
            StructuredType::complex("Test", "Region")
                .with_property(Property::structural(
                    "Code",
                    TypeRef::primitive(PrimitiveKind::String),
                ))
                .with_property(Property::structural(
                    "Zone",
                    TypeRef::primitive(PrimitiveKind::String),
                )),
        )
        .structured_type(
            StructuredType::complex("Test", "Address")
                .with_property(Property::structural(
                    "City",
                    TypeRef::primitive(PrimitiveKind::String),
                ))
                .with_property(Property::structural(
                    "Region",
                    TypeRef::structured("Test.Region"),
                )),
        )
        .structured_type(
            StructuredType::entity("Test", "Customer")
                .with_property(Property::structural(
                    "Id",
                    TypeRef::primitive(PrimitiveKind::Int32),
                ))
                .with_property(Property::structural(
                    "Name",
                    TypeRef::primitive(PrimitiveKind::String),
                ))
                .with_property(Property::structural(
                    "Tier",
                    TypeRef::nullable(PrimitiveKind::String),
                ))
                .with_property(Property::structural(
                    "Address",
                    TypeRef::structured("Test.Address"),
                ))
                .with_property(Property::stream("Photo"))
                .with_property(Property::collection_navigation("Orders", "Test.Order"))
                .with_property(Property::navigation("BestFriend", "Test.Customer")),
        )
        .structured_type(
            StructuredType::entity("Test", "VipCustomer")
                .with_base("Test.Customer")
                .with_property(Property::structural(
                    "Discount",
                    TypeRef::nullable(PrimitiveKind::Double),
                )),
        )
        .structured_type(
            StructuredType::entity("Test", "Order")
                .with_property(Property::structural(
                    "Id",
                    TypeRef::primitive(PrimitiveKind::Int32),
                ))
                .with_property(Property::structural(
                    "Amount",
                    TypeRef::primitive(PrimitiveKind::Decimal),
                ))
                .with_property(Property::structural(
                    "Price",
                    TypeRef::nullable(PrimitiveKind::Double),
                ))
                .with_property(Property::structural(
                    "Quantity",
                    TypeRef::primitive(PrimitiveKind::Int32),
                ))
                .with_property(Property::structural(
                    "Category",
                    TypeRef::primitive(PrimitiveKind::String),
                ))
                .with_property(Property::collection_navigation("Products", "Test.Product"))
                .with_property(Property::navigation("Customer", "Test.Customer")),
        )
        .structured_type(
            StructuredType::entity("Test", "Product")
                .with_property(Property::structural(
                    "Id",
                    TypeRef::primitive(PrimitiveKind::Int32),
                ))
                .with_property(Property::structural(
                    "Name",
                    TypeRef::primitive(PrimitiveKind::String),
                ))
                .with_property(Property::structural(
                    "Cost",
                    TypeRef::primitive(PrimitiveKind::Decimal),
                ))
                .with_property(Property::structural(
                    "Rating",
                    TypeRef::nullable(PrimitiveKind::Single),
                )),
        )
        .structured_type(
            StructuredType::entity("Test", "Document")
                .with_property(Property::structural(
                    "Id",
                    TypeRef::primitive(PrimitiveKind::Int32),
                ))
                .open(),
        )
        .navigation_source(
            NavigationSource::new("Customers", "Test.Customer")
                .with_binding("Orders", "Orders")
                .with_binding("BestFriend", "Customers"),
        )
        .navigation_source(
            NavigationSource::new("Orders", "Test.Order")
                .with_binding("Products", "Products")
                .with_binding("Customer", "Customers"),
        )
        .navigation_source(NavigationSource::new("Products", "Test.Product"))
        .navigation_source(NavigationSource::new("Documents", "Test.Document"))
        .build()
}
