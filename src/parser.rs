use crate::error::{Error, Result};
use crate::registry::TypeRegistry;
use crate::tokenizer::{Tokenizer, is_word_char};
use crate::types::{FunctionDescriptor, TypeDescriptor};
use serde::Serialize;

/// outcome of parsing one declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Declaration {
    /// a bare type or a named variable/field
    Type(TypeDescriptor),
    /// a function or function-pointer declaration
    Function(FunctionDescriptor),
}

impl Declaration {
    pub fn into_type(self) -> Option<TypeDescriptor> {
        match self {
            Declaration::Type(d) => Some(d),
            Declaration::Function(_) => None,
        }
    }

    pub fn into_function(self) -> Option<FunctionDescriptor> {
        match self {
            Declaration::Function(f) => Some(f),
            Declaration::Type(_) => None,
        }
    }
}

/// recursive-descent parser for C-style declarations.
///
/// the registry is only consulted for its keyword set (to merge multi-word
/// type names during tokenization); parsing records type spellings without
/// resolving them, so a declaration can be parsed before every name it
/// mentions has been defined.
pub struct DeclParser<'reg> {
    registry: &'reg TypeRegistry,
}

impl<'reg> DeclParser<'reg> {
    pub fn new(registry: &'reg TypeRegistry) -> Self {
        Self { registry }
    }

    /// parse one declaration: a bare type (`void*`), a named variable
    /// (`int i`), a function (`void my_fn(void)`), or a function pointer
    /// (`void (*my_fn)(void)`)
    pub fn parse(&self, declaration: &str) -> Result<Declaration> {
        log::trace!("{:>12} {}", "parse", declaration);
        let mut t = Tokenizer::new(declaration, self.registry);
        let decl_type = parse_type(&mut t)?;

        if t.is_exhausted() {
            // bare unnamed type
            return Ok(Declaration::Type(decl_type));
        }

        if t.next()? == "(" {
            // function pointer form, e.g. `void (*my_fn)(void)`
            t.push_back()?;
            let name = parse_fn_name(&mut t)?;
            let param_list = parse_param_list(&mut t)?;
            if !t.is_exhausted() {
                return Err(Error::TrailingTokens(t.source().to_string()));
            }
            return Ok(Declaration::Function(FunctionDescriptor {
                return_type: decl_type,
                name,
                param_list,
            }));
        }

        t.push_back()?;
        let name = t.next()?.to_string();

        if !t.is_exhausted() {
            if t.next()? == "(" {
                // plain function declaration, e.g. `void my_fn(void)`
                t.push_back()?;
                let param_list = parse_param_list(&mut t)?;
                if !t.is_exhausted() {
                    return Err(Error::TrailingTokens(t.source().to_string()));
                }
                return Ok(Declaration::Function(FunctionDescriptor {
                    return_type: decl_type,
                    name,
                    param_list,
                }));
            }
            // anything after a plain declarator name is rejected; array
            // suffixes are not supported
            return Err(Error::TrailingTokens(t.source().to_string()));
        }

        // named variable declaration
        let mut var = decl_type;
        var.name = name;
        Ok(Declaration::Type(var))
    }
}

/// base type word plus any trailing `*` tokens, accumulated into one
/// spelling (`void**`). the first non-star token is pushed back.
fn parse_type(t: &mut Tokenizer) -> Result<TypeDescriptor> {
    let mut spelling = t.next()?.to_string();
    while !t.is_exhausted() {
        if t.next()? == "*" {
            spelling.push('*');
        } else {
            t.push_back()?;
            break;
        }
    }
    Ok(TypeDescriptor::new(spelling))
}

/// declarator name in the `( * IDENT )` function-pointer form, or a bare
/// identifier
fn parse_fn_name(t: &mut Tokenizer) -> Result<String> {
    if t.next()? == "(" {
        expect(t, "*")?;
        let name = t.next()?.to_string();
        expect(t, ")")?;
        Ok(name)
    } else {
        Ok(t.current().to_string())
    }
}

/// one parameter: a type, optionally followed by a name. a following token
/// that does not look like an identifier is pushed back and the parameter
/// stays unnamed.
fn parse_param(t: &mut Tokenizer) -> Result<TypeDescriptor> {
    let mut param = parse_type(t)?;
    let token = t.next()?.to_string();
    if is_identifier(&token) {
        param.name = token;
    } else {
        t.push_back()?;
    }
    Ok(param)
}

/// `(` [ param ( `,` param )* ] `)`. note that `(void)` is not
/// special-cased here: it parses as one unnamed `void` parameter, and is
/// stripped later when the descriptor resolves to a callable signature.
fn parse_param_list(t: &mut Tokenizer) -> Result<Vec<TypeDescriptor>> {
    expect(t, "(")?;
    let mut params = Vec::new();
    while t.next()? != ")" {
        t.push_back()?;
        params.push(parse_param(t)?);
        if t.next()? != "," {
            break;
        }
    }
    if t.current() != ")" {
        let found = t.current().to_string();
        return Err(Error::Malformed {
            expected: ")",
            found,
            input: t.source().to_string(),
        });
    }
    Ok(params)
}

fn expect(t: &mut Tokenizer, literal: &'static str) -> Result<()> {
    let token = t.next()?.to_string();
    if token != literal {
        return Err(Error::Malformed {
            expected: literal,
            found: token,
            input: t.source().to_string(),
        });
    }
    Ok(())
}

fn is_identifier(token: &str) -> bool {
    !token.is_empty() && token.chars().all(is_word_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(declaration: &str) -> Result<Declaration> {
        let registry = TypeRegistry::new();
        DeclParser::new(&registry).parse(declaration)
    }

    #[test]
    fn test_bare_type() {
        let d = parse("int").unwrap().into_type().unwrap();
        assert_eq!(d.type_name, "int");
        assert_eq!(d.name, "");

        let d = parse("void").unwrap().into_type().unwrap();
        assert_eq!(d.type_name, "void");

        let d = parse("void*").unwrap().into_type().unwrap();
        assert_eq!(d.type_name, "void*");
        assert_eq!(d.name, "");
    }

    #[test]
    fn test_named_variable() {
        let d = parse("int i").unwrap().into_type().unwrap();
        assert_eq!(d.type_name, "int");
        assert_eq!(d.name, "i");
    }

    #[test]
    fn test_pointer_variable_star_placement() {
        // `int* i` and `int *i` are the same declaration
        for decl in ["int* i", "int *i"] {
            let d = parse(decl).unwrap().into_type().unwrap();
            assert_eq!(d.type_name, "int*", "from {:?}", decl);
            assert_eq!(d.name, "i");
        }
    }

    #[test]
    fn test_multi_level_pointer() {
        let d = parse("void** handle").unwrap().into_type().unwrap();
        assert_eq!(d.type_name, "void**");
        assert_eq!(d.name, "handle");
    }

    #[test]
    fn test_multi_word_base_type() {
        let d = parse("unsigned long long x").unwrap().into_type().unwrap();
        assert_eq!(d.type_name, "unsigned long long");
        assert_eq!(d.name, "x");
    }

    #[test]
    fn test_function_declaration() {
        let f = parse("int hello(void *name)").unwrap().into_function().unwrap();
        assert_eq!(f.name, "hello");
        assert_eq!(f.return_type.type_name, "int");
        assert_eq!(f.return_type.name, "");
        assert_eq!(f.param_list.len(), 1);
        assert_eq!(f.param_list[0].type_name, "void*");
        assert_eq!(f.param_list[0].name, "name");
    }

    #[test]
    fn test_function_pointer_declaration() {
        let f = parse("CFRunLoopSourceRef (*GetInterfaceAsyncEventSource)(void *self)")
            .unwrap()
            .into_function()
            .unwrap();
        assert_eq!(f.name, "GetInterfaceAsyncEventSource");
        assert_eq!(f.return_type.type_name, "CFRunLoopSourceRef");
        assert_eq!(f.param_list.len(), 1);
        assert_eq!(f.param_list[0].type_name, "void*");
        assert_eq!(f.param_list[0].name, "self");
    }

    #[test]
    fn test_plain_and_pointer_forms_agree() {
        let plain = parse("CFRunLoopSourceRef GetSource(void *self)")
            .unwrap()
            .into_function()
            .unwrap();
        let pointer = parse("CFRunLoopSourceRef (*GetSource)(void *self)")
            .unwrap()
            .into_function()
            .unwrap();
        assert_eq!(plain, pointer);
    }

    #[test]
    fn test_void_parameter_parses_as_one_param() {
        let f = parse("void my_fn(void)").unwrap().into_function().unwrap();
        assert_eq!(f.name, "my_fn");
        assert_eq!(f.param_list.len(), 1);
        assert_eq!(f.param_list[0].type_name, "void");
        assert_eq!(f.param_list[0].name, "");
    }

    #[test]
    fn test_empty_parameter_list() {
        let f = parse("void my_fn()").unwrap().into_function().unwrap();
        assert!(f.param_list.is_empty());
    }

    #[test]
    fn test_multiple_parameters() {
        let f = parse("int ioctl(int fd, unsigned long request, void *argp)")
            .unwrap()
            .into_function()
            .unwrap();
        assert_eq!(f.param_list.len(), 3);
        assert_eq!(f.param_list[0].type_name, "int");
        assert_eq!(f.param_list[0].name, "fd");
        assert_eq!(f.param_list[1].type_name, "unsigned long");
        assert_eq!(f.param_list[1].name, "request");
        assert_eq!(f.param_list[2].type_name, "void*");
        assert_eq!(f.param_list[2].name, "argp");
    }

    #[test]
    fn test_unnamed_parameters() {
        let f = parse("int add(int, int)").unwrap().into_function().unwrap();
        assert_eq!(f.param_list.len(), 2);
        assert_eq!(f.param_list[0].name, "");
        assert_eq!(f.param_list[1].name, "");
    }

    #[test]
    fn test_merged_keyword_parameter_with_name() {
        let registry = TypeRegistry::new();
        let f = DeclParser::new(&registry)
            .parse("void* my_fn(long long count)")
            .unwrap()
            .into_function()
            .unwrap();
        assert_eq!(f.param_list.len(), 1);
        assert_eq!(f.param_list[0].type_name, "long long");
        assert_eq!(f.param_list[0].name, "count");
    }

    #[test]
    fn test_unterminated_param_list() {
        match parse("void (") {
            Err(Error::Exhausted(_)) | Err(Error::Malformed { .. }) => {}
            other => panic!("expected parse failure, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_fn_pointer() {
        // missing `*` inside the declarator parens
        match parse("void (my_fn)(void)") {
            Err(Error::Malformed { expected, .. }) => assert_eq!(expected, "*"),
            other => panic!("expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_tokens_after_function() {
        match parse("void my_fn(void) extra") {
            Err(Error::TrailingTokens(_)) => {}
            other => panic!("expected TrailingTokens, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_tokens_after_variable() {
        // array suffixes are not supported and must not be dropped silently
        match parse("int arr, x") {
            Err(Error::TrailingTokens(_)) => {}
            other => panic!("expected TrailingTokens, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse(""), Err(Error::Exhausted(_))));
    }

    #[test]
    fn test_parse_does_not_resolve() {
        // unknown names parse fine; resolution is a separate step
        let d = parse("SomeUnknownRef handle").unwrap().into_type().unwrap();
        assert_eq!(d.type_name, "SomeUnknownRef");
        assert_eq!(d.name, "handle");
    }
}
