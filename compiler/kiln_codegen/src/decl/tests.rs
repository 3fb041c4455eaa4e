use kiln_ir::{FieldFlags, FunctionFlags, Metadata, ValueType};
use pretty_assertions::assert_eq;

use super::*;
use crate::test_helpers::Fixture;

#[test]
fn edit_visibility_picks_the_most_specific_tag() {
    let cases = [
        (
            FieldFlags::EDIT | FieldFlags::EDIT_CONST | FieldFlags::DISABLE_EDIT_ON_INSTANCE,
            "VisibleDefaultsOnly",
        ),
        (
            FieldFlags::EDIT | FieldFlags::EDIT_CONST | FieldFlags::DISABLE_EDIT_ON_TEMPLATE,
            "VisibleInstanceOnly",
        ),
        (FieldFlags::EDIT | FieldFlags::EDIT_CONST, "VisibleAnywhere"),
        (FieldFlags::EDIT | FieldFlags::DISABLE_EDIT_ON_INSTANCE, "EditDefaultsOnly"),
        (FieldFlags::EDIT | FieldFlags::DISABLE_EDIT_ON_TEMPLATE, "EditInstanceOnly"),
        (FieldFlags::EDIT, "EditAnywhere"),
    ];
    for (flags, expected) in cases {
        assert_eq!(property_tags(flags), vec![expected]);
    }
    assert!(property_tags(FieldFlags::EDIT_CONST).is_empty());
}

#[test]
fn blueprint_config_and_simple_tags() {
    let flags = FieldFlags::BLUEPRINT_VISIBLE
        | FieldFlags::BLUEPRINT_READ_ONLY
        | FieldFlags::CONFIG
        | FieldFlags::GLOBAL_CONFIG
        | FieldFlags::TRANSIENT
        | FieldFlags::SAVE_GAME;
    assert_eq!(
        property_tags(flags),
        vec!["BlueprintReadOnly", "GlobalConfig", "Transient", "SaveGame"]
    );
    assert_eq!(
        property_tags(FieldFlags::BLUEPRINT_VISIBLE | FieldFlags::CONFIG),
        vec!["BlueprintReadWrite", "Config"]
    );
    // Interp needs edit and blueprint visibility too.
    assert!(!property_tags(FieldFlags::INTERP).contains(&"Interp"));
    assert!(property_tags(
        FieldFlags::EDIT | FieldFlags::BLUEPRINT_VISIBLE | FieldFlags::INTERP
    )
    .contains(&"Interp"));
}

#[test]
fn metadata_skips_editor_keys_and_strips_newlines() {
    let mut meta = Metadata::new();
    meta.set("ModuleRelativePath", "Public/Hero.h");
    meta.set("ToolTip", "Hit\npoints");
    meta.set("ExposeOnSpawn", "");
    assert_eq!(
        metadata_tag(&meta, true).as_deref(),
        Some("meta=(ToolTip=\"Hitpoints\", ExposeOnSpawn, Category)")
    );

    meta.set("Category", "Combat");
    assert_eq!(
        metadata_tag(&meta, true).as_deref(),
        Some("meta=(ToolTip=\"Hitpoints\", ExposeOnSpawn, Category=\"Combat\")")
    );
    assert_eq!(metadata_tag(&Metadata::new(), false), None);
}

#[test]
fn uproperty_with_replication() {
    let mut fx = Fixture::new();
    let hp = fx.field("Hp", ValueType::int());
    fx.reg.field_mut(hp).flags =
        FieldFlags::EDIT | FieldFlags::BLUEPRINT_VISIBLE | FieldFlags::NET | FieldFlags::REP_NOTIFY;
    fx.reg.field_mut(hp).rep_notify = Some(fx.reg.intern("OnRep_Hp"));
    let ammo = fx.field("Ammo", ValueType::int());
    fx.reg.field_mut(ammo).flags = FieldFlags::NET;
    fx.reg.field_mut(ammo).array_dim = 4;

    assert_eq!(
        uproperty(&fx.reg, hp),
        "UPROPERTY(EditAnywhere, BlueprintReadWrite, ReplicatedUsing=OnRep_Hp, meta=(Category))"
    );
    assert_eq!(uproperty(&fx.reg, ammo), "UPROPERTY(Replicated)");
    assert_eq!(field_declaration(&fx.reg, hp), "int32 Hp;");
    assert_eq!(field_declaration(&fx.reg, ammo), "int32 Ammo[4];");

    assert_eq!(
        lifetime_replicated_props(&fx.reg, fx.hero, "\t").as_deref(),
        Some(
            "\
void AHero::GetLifetimeReplicatedProps(TArray< FLifetimeProperty > & OutLifetimeProps) const
{
\tSuper::GetLifetimeReplicatedProps(OutLifetimeProps);
\tDOREPLIFETIME( AHero, Hp);
\tDOREPLIFETIME( AHero, Ammo);
}
"
        )
    );
    assert!(lifetime_replicated_props_declaration(&fx.reg, fx.hero).is_some());
}

#[test]
fn no_replication_function_without_replicated_fields() {
    let mut fx = Fixture::new();
    fx.field("Hp", ValueType::int());
    assert_eq!(lifetime_replicated_props(&fx.reg, fx.hero, "\t"), None);
    assert_eq!(lifetime_replicated_props_declaration(&fx.reg, fx.hero), None);
}

#[test]
fn ufunction_tags() {
    let mut fx = Fixture::new();
    let heal = fx.declare(fx.hero, "Heal");
    fx.reg.function_mut(heal).flags = FunctionFlags::BLUEPRINT_CALLABLE
        | FunctionFlags::BLUEPRINT_PURE
        | FunctionFlags::NET
        | FunctionFlags::NET_SERVER
        | FunctionFlags::NET_RELIABLE;
    assert_eq!(
        ufunction(&fx.reg, heal),
        "UFUNCTION(Server, Reliable, BlueprintCallable, BlueprintPure, meta=(Category))"
    );

    let usable = fx.reg.add_interface("Usable");
    let use_fn = fx.declare(usable, "Use");
    assert_eq!(ufunction(&fx.reg, use_fn), "UFUNCTION(BlueprintNativeEvent)");

    let plain = fx.declare(fx.hero, "Plain");
    assert_eq!(ufunction(&fx.reg, plain), "UFUNCTION()");
}

#[test]
fn delegate_signatures_by_parameter_count() {
    let mut fx = Fixture::new();
    let on_hit = fx.declare(fx.hero, "OnHit__DelegateSignature");
    fx.reg.add_param(on_hit, "Damage", ValueType::float(), FieldFlags::empty());
    fx.reg.add_param(on_hit, "Instigator", ValueType::object(fx.hero), FieldFlags::empty());
    let on_hit_field = fx.field("OnHit", ValueType::multicast_delegate(on_hit));
    // A second field sharing the signature declares it once.
    fx.field("OnHitAgain", ValueType::multicast_delegate(on_hit));

    let on_done = fx.declare(fx.hero, "OnDone__DelegateSignature");
    fx.field("OnDone", ValueType::delegate(on_done));

    let wide = fx.declare(fx.hero, "Wide__DelegateSignature");
    for index in 0..9 {
        fx.reg.add_param(wide, &format!("P{index}"), ValueType::int(), FieldFlags::empty());
    }
    fx.field("Wide", ValueType::delegate(wide));

    assert_eq!(
        delegate_declaration(&fx.reg, on_hit_field).as_deref(),
        Some(
            "DECLARE_DYNAMIC_MULTICAST_DELEGATE_TwoParams(FOnHit__DelegateSignature, float, Damage, AHero*, Instigator)"
        )
    );
    let declarations = delegate_declarations(&fx.reg, fx.hero);
    assert_eq!(declarations.len(), 3);
    assert_eq!(declarations[1], "DECLARE_DYNAMIC_DELEGATE(FOnDone__DelegateSignature)");
    assert!(declarations[2].starts_with("DECLARE_DYNAMIC_DELEGATE_TooMany(FWide__DelegateSignature, int32, P0"));
}
