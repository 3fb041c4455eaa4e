//! Declaration decorations: `UPROPERTY`, `UFUNCTION`, delegate signature
//! macros and replication registration.

use kiln_ir::{
    Category, FieldDesc, FieldFlags, FieldId, FunctionFlags, FunctionId, Metadata, Reflection,
    TypeId, TypeKind,
};

use crate::cpp_types::{cpp_type, delegate_type_name};
use crate::CodeWriter;

/// Tags emitted when every listed flag is present.
const SIMPLE_PROPERTY_TAGS: &[(&str, FieldFlags)] = &[
    ("Transient", FieldFlags::TRANSIENT),
    ("DuplicateTransient", FieldFlags::DUPLICATE_TRANSIENT),
    ("TextExportTransient", FieldFlags::TEXT_EXPORT_TRANSIENT),
    ("NonPIEDuplicateTransient", FieldFlags::NON_PIE_DUPLICATE_TRANSIENT),
    ("Export", FieldFlags::EXPORT_OBJECT),
    ("NoClear", FieldFlags::NO_CLEAR),
    ("EditFixedSize", FieldFlags::EDIT_FIXED_SIZE),
    ("NotReplicated", FieldFlags::REP_SKIP),
    (
        "Interp",
        FieldFlags::EDIT
            .union(FieldFlags::BLUEPRINT_VISIBLE)
            .union(FieldFlags::INTERP),
    ),
    ("NonTransactional", FieldFlags::NON_TRANSACTIONAL),
    ("BlueprintAssignable", FieldFlags::BLUEPRINT_ASSIGNABLE),
    ("BlueprintCallable", FieldFlags::BLUEPRINT_CALLABLE),
    ("BlueprintAuthorityOnly", FieldFlags::BLUEPRINT_AUTHORITY_ONLY),
    ("AssetRegistrySearchable", FieldFlags::ASSET_REGISTRY_SEARCHABLE),
    ("SimpleDisplay", FieldFlags::SIMPLE_DISPLAY),
    ("AdvancedDisplay", FieldFlags::ADVANCED_DISPLAY),
    ("SaveGame", FieldFlags::SAVE_GAME),
];

const FUNCTION_TAGS: &[(&str, FunctionFlags)] = &[
    ("Exec", FunctionFlags::EXEC),
    ("Server", FunctionFlags::NET.union(FunctionFlags::NET_SERVER)),
    ("Client", FunctionFlags::NET.union(FunctionFlags::NET_CLIENT)),
    ("NetMulticast", FunctionFlags::NET.union(FunctionFlags::NET_MULTICAST)),
    ("Reliable", FunctionFlags::NET_RELIABLE),
    ("BlueprintCallable", FunctionFlags::BLUEPRINT_CALLABLE),
    (
        "BlueprintPure",
        FunctionFlags::BLUEPRINT_CALLABLE.union(FunctionFlags::BLUEPRINT_PURE),
    ),
    ("BlueprintAuthorityOnly", FunctionFlags::BLUEPRINT_AUTHORITY_ONLY),
    ("BlueprintCosmetic", FunctionFlags::BLUEPRINT_COSMETIC),
    ("WithValidation", FunctionFlags::NET_VALIDATE),
];

/// Metadata keys that only exist in the editor.
const EDITOR_ONLY_METADATA: &[&str] = &["ModuleRelativePath"];

/// Specifier tags for a field's flags, in declaration order.
pub fn property_tags(flags: FieldFlags) -> Vec<&'static str> {
    let mut tags = Vec::new();
    let edit = |extra: FieldFlags| flags.contains(FieldFlags::EDIT | extra);

    let visibility = if edit(FieldFlags::EDIT_CONST | FieldFlags::DISABLE_EDIT_ON_INSTANCE) {
        Some("VisibleDefaultsOnly")
    } else if edit(FieldFlags::EDIT_CONST | FieldFlags::DISABLE_EDIT_ON_TEMPLATE) {
        Some("VisibleInstanceOnly")
    } else if edit(FieldFlags::EDIT_CONST) {
        Some("VisibleAnywhere")
    } else if edit(FieldFlags::DISABLE_EDIT_ON_INSTANCE) {
        Some("EditDefaultsOnly")
    } else if edit(FieldFlags::DISABLE_EDIT_ON_TEMPLATE) {
        Some("EditInstanceOnly")
    } else if edit(FieldFlags::empty()) {
        Some("EditAnywhere")
    } else {
        None
    };
    tags.extend(visibility);

    if flags.contains(FieldFlags::BLUEPRINT_VISIBLE | FieldFlags::BLUEPRINT_READ_ONLY) {
        tags.push("BlueprintReadOnly");
    } else if flags.contains(FieldFlags::BLUEPRINT_VISIBLE) {
        tags.push("BlueprintReadWrite");
    }

    if flags.contains(FieldFlags::GLOBAL_CONFIG | FieldFlags::CONFIG) {
        tags.push("GlobalConfig");
    } else if flags.contains(FieldFlags::CONFIG) {
        tags.push("Config");
    }

    tags.extend(
        SIMPLE_PROPERTY_TAGS
            .iter()
            .filter(|(_, required)| flags.contains(*required))
            .map(|(tag, _)| *tag),
    );
    tags
}

/// `meta=(Key="Value", Flag)`; `None` when there is nothing to write.
///
/// Editor-only keys are dropped and values lose their newlines. A bare
/// `Category` is added when `add_category` is set and none is present.
pub fn metadata_tag(metadata: &Metadata, add_category: bool) -> Option<String> {
    let mut entries: Vec<String> = metadata
        .iter()
        .filter(|(key, _)| !EDITOR_ONLY_METADATA.contains(key))
        .map(|(key, value)| {
            if value.is_empty() {
                key.to_owned()
            } else {
                format!("{key}=\"{}\"", value.replace('\n', ""))
            }
        })
        .collect();
    if add_category && !metadata.contains("Category") {
        entries.push(String::from("Category"));
    }
    if entries.is_empty() {
        None
    } else {
        Some(format!("meta=({})", entries.join(", ")))
    }
}

fn replication_tag(reflect: &dyn Reflection, field: &FieldDesc) -> Option<String> {
    if !field.flags.contains(FieldFlags::NET) {
        return None;
    }
    match field.rep_notify {
        Some(notify) if field.flags.contains(FieldFlags::REP_NOTIFY) => {
            Some(format!("ReplicatedUsing={}", reflect.resolve(notify)))
        }
        _ => Some(String::from("Replicated")),
    }
}

/// `UPROPERTY(...)` line for a field.
pub fn uproperty(reflect: &dyn Reflection, field: FieldId) -> String {
    let desc = reflect.field(field);
    let mut tags: Vec<String> = property_tags(desc.flags).into_iter().map(String::from).collect();
    tags.extend(replication_tag(reflect, desc));
    let needs_category = desc
        .flags
        .intersects(FieldFlags::EDIT | FieldFlags::BLUEPRINT_VISIBLE);
    tags.extend(metadata_tag(&desc.metadata, needs_category));
    format!("UPROPERTY({})", tags.join(", "))
}

/// `Type Name;` or `Type Name[N];` for static arrays.
pub fn field_declaration(reflect: &dyn Reflection, field: FieldId) -> String {
    let desc = reflect.field(field);
    let ty = cpp_type(reflect, &desc.ty);
    let name = reflect.resolve(desc.name);
    if desc.array_dim > 1 {
        format!("{ty} {name}[{}];", desc.array_dim)
    } else {
        format!("{ty} {name};")
    }
}

/// `UFUNCTION(...)` line for a function.
pub fn ufunction(reflect: &dyn Reflection, func: FunctionId) -> String {
    let desc = reflect.function(func);
    let mut tags: Vec<String> = FUNCTION_TAGS
        .iter()
        .filter(|(_, required)| desc.flags.contains(*required))
        .map(|(tag, _)| String::from(*tag))
        .collect();
    if reflect.type_desc(desc.owner).kind == TypeKind::Interface {
        tags.push(String::from("BlueprintNativeEvent"));
    }
    let needs_category = desc
        .flags
        .intersects(FunctionFlags::BLUEPRINT_CALLABLE | FunctionFlags::BLUEPRINT_PURE);
    tags.extend(metadata_tag(&desc.metadata, needs_category));
    format!("UFUNCTION({})", tags.join(", "))
}

fn param_count_suffix(count: usize) -> &'static str {
    match count {
        0 => "",
        1 => "_OneParam",
        2 => "_TwoParams",
        3 => "_ThreeParams",
        4 => "_FourParams",
        5 => "_FiveParams",
        6 => "_SixParams",
        7 => "_SevenParams",
        8 => "_EightParams",
        _ => "_TooMany",
    }
}

/// `DECLARE_DYNAMIC_[MULTICAST_]DELEGATE_<N>Params(FSig, Type, Name, ...)`
/// for a delegate-typed field; `None` for anything else.
pub fn delegate_declaration(reflect: &dyn Reflection, field: FieldId) -> Option<String> {
    let ty = reflect.field(field).ty;
    let signature = ty.signature?;
    let macro_name = match ty.category {
        Category::Delegate => "DECLARE_DYNAMIC_DELEGATE",
        Category::MulticastDelegate => "DECLARE_DYNAMIC_MULTICAST_DELEGATE",
        _ => return None,
    };

    let mut params = String::new();
    let mut count = 0;
    for &param in &reflect.function(signature).params {
        let desc = reflect.field(param);
        if desc.is_return() {
            continue;
        }
        let param_ty = cpp_type(reflect, &desc.ty);
        let reference = if desc.is_out() { "&" } else { "" };
        params.push_str(&format!(", {param_ty}{reference}, {}", reflect.resolve(desc.name)));
        count += 1;
    }
    Some(format!(
        "{macro_name}{}({}{params})",
        param_count_suffix(count),
        delegate_type_name(reflect, &ty)
    ))
}

/// Delegate declarations for the unit's own fields, one per signature.
pub fn delegate_declarations(reflect: &dyn Reflection, unit: TypeId) -> Vec<String> {
    let mut declarations: Vec<String> = Vec::new();
    for &field in reflect.own_fields(unit) {
        if let Some(declaration) = delegate_declaration(reflect, field) {
            if !declarations.contains(&declaration) {
                declarations.push(declaration);
            }
        }
    }
    declarations
}

fn replicated_fields(reflect: &dyn Reflection, unit: TypeId) -> Vec<FieldId> {
    reflect
        .own_fields(unit)
        .iter()
        .copied()
        .filter(|&f| reflect.field(f).flags.contains(FieldFlags::NET))
        .collect()
}

/// In-class declaration of the replication function, if the unit has any
/// replicated fields.
pub fn lifetime_replicated_props_declaration(
    reflect: &dyn Reflection,
    unit: TypeId,
) -> Option<&'static str> {
    if replicated_fields(reflect, unit).is_empty() {
        None
    } else {
        Some(
            "virtual void GetLifetimeReplicatedProps(TArray< FLifetimeProperty > & OutLifetimeProps) const override;",
        )
    }
}

/// Out-of-class replication function registering every replicated own
/// field; `None` when there are none.
pub fn lifetime_replicated_props(reflect: &dyn Reflection, unit: TypeId, indent: &str) -> Option<String> {
    let fields = replicated_fields(reflect, unit);
    if fields.is_empty() {
        return None;
    }
    let class = reflect.cpp_name(unit);
    let mut out = CodeWriter::new(indent);
    out.writeln(&format!(
        "void {class}::GetLifetimeReplicatedProps(TArray< FLifetimeProperty > & OutLifetimeProps) const"
    ));
    out.block(|out| {
        out.writeln("Super::GetLifetimeReplicatedProps(OutLifetimeProps);");
        for field in fields {
            out.writeln(&format!("DOREPLIFETIME( {class}, {});", reflect.field_name(field)));
        }
    });
    Some(out.into_output())
}

#[cfg(test)]
mod tests;
