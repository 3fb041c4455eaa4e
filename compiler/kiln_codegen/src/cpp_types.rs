//! Declared types to C++ type spelling.

use kiln_ir::{Category, Reflection, TypeKind, ValueType};

/// C++ spelling of a declared type as used for fields, locals and params.
pub fn cpp_type(reflect: &dyn Reflection, ty: &ValueType) -> String {
    if ty.is_array() {
        return format!("TArray<{}>", cpp_type(reflect, &ty.element()));
    }
    let named = |fallback: &str| {
        ty.sub_type
            .map_or_else(|| fallback.to_owned(), |id| reflect.cpp_name(id))
    };
    match ty.category {
        Category::Bool => String::from("bool"),
        Category::Byte => match ty.sub_type {
            Some(id) if reflect.type_desc(id).kind == TypeKind::Enum => reflect.cpp_name(id),
            _ => String::from("uint8"),
        },
        Category::Int => String::from("int32"),
        Category::Float => String::from("float"),
        Category::Name => String::from("FName"),
        Category::String => String::from("FString"),
        Category::Text => String::from("FText"),
        Category::Struct => named("FStruct"),
        Category::Object => format!("{}*", named("UObject")),
        Category::Class => format!("TSubclassOf<{}>", named("UObject")),
        Category::Interface => match ty.sub_type {
            Some(id) => format!("TScriptInterface<{}>", reflect.interface_cpp_name(id)),
            None => String::from("FScriptInterface"),
        },
        Category::SoftObject => format!("TAssetPtr<{}>", named("UObject")),
        Category::SoftClass => format!("TAssetSubclassOf<{}>", named("UObject")),
        Category::Delegate | Category::MulticastDelegate => delegate_type_name(reflect, ty),
    }
}

/// Delegate type declared for a signature function, `F<Signature>`.
pub fn delegate_type_name(reflect: &dyn Reflection, ty: &ValueType) -> String {
    match ty.signature {
        Some(sig) => format!("F{}", reflect.function_name(sig)),
        None if ty.category == Category::MulticastDelegate => {
            String::from("FMulticastScriptDelegate")
        }
        None => String::from("FScriptDelegate"),
    }
}
