/* 📖 # Why generate the docs from one route table?

The HTML page at `/api-docs` and the OpenAPI document at
`/api-docs/openapi.json` both describe the same routes. Building both from
`ROUTES` means adding a route is one table entry, and the two views cannot
drift apart.
*/

use serde_json::{Map, Value, json};

/// Documentation for one route.
#[derive(Debug, Clone, Copy)]
pub struct RouteDoc {
    pub method: &'static str,
    /// Path in OpenAPI template form (`/pokemons/{id}`).
    pub path: &'static str,
    pub summary: &'static str,
    pub parameters: &'static [ParamDoc],
    /// Request body schema reference, if the route takes a body.
    pub body: Option<&'static str>,
    pub responses: &'static [(u16, &'static str)],
}

#[derive(Debug, Clone, Copy)]
pub struct ParamDoc {
    pub name: &'static str,
    /// `path` or `query`.
    pub location: &'static str,
    pub required: bool,
    pub description: &'static str,
}

const ID_PARAM: ParamDoc = ParamDoc {
    name: "id",
    location: "path",
    required: true,
    description: "Domain id of the Pokémon",
};

pub const ROUTES: &[RouteDoc] = &[
    RouteDoc {
        method: "GET",
        path: "/pokemons",
        summary: "List every Pokémon",
        parameters: &[],
        body: None,
        responses: &[(200, "Array of Pokémon"), (500, "Server error")],
    },
    RouteDoc {
        method: "GET",
        path: "/pokemons/20",
        summary: "List Pokémon 20 at a time",
        parameters: &[ParamDoc {
            name: "page",
            location: "query",
            required: false,
            description: "1-based page number, defaults to 1",
        }],
        body: None,
        responses: &[(200, "Page envelope {page, limit, count, data}"), (500, "Server error")],
    },
    RouteDoc {
        method: "GET",
        path: "/pokemons/search",
        summary: "Find Pokémon whose name contains a string, in any language",
        parameters: &[ParamDoc {
            name: "name",
            location: "query",
            required: true,
            description: "Case-insensitive substring of an english, french, japanese or chinese name",
        }],
        body: None,
        responses: &[
            (200, "Array of matching Pokémon"),
            (400, "Missing name parameter"),
            (500, "Server error"),
        ],
    },
    RouteDoc {
        method: "GET",
        path: "/pokemons/{id}",
        summary: "Get one Pokémon",
        parameters: &[ID_PARAM],
        body: None,
        responses: &[(200, "The Pokémon"), (404, "Pokemon not found"), (500, "Server error")],
    },
    RouteDoc {
        method: "POST",
        path: "/pokemons",
        summary: "Create a Pokémon",
        parameters: &[],
        body: Some("Pokemon"),
        responses: &[
            (201, "The created Pokémon"),
            (400, "Invalid body"),
            (409, "Id already taken"),
            (500, "Server error"),
        ],
    },
    RouteDoc {
        method: "PUT",
        path: "/pokemons/{id}",
        summary: "Replace some fields of a Pokémon",
        parameters: &[ID_PARAM],
        body: Some("PokemonUpdate"),
        responses: &[
            (200, "The updated Pokémon"),
            (400, "Invalid body"),
            (404, "Pokemon not found"),
            (500, "Server error"),
        ],
    },
    RouteDoc {
        method: "DELETE",
        path: "/pokemons/{id}",
        summary: "Delete a Pokémon",
        parameters: &[ID_PARAM],
        body: None,
        responses: &[
            (200, "{message, id}"),
            (404, "Pokemon not found"),
            (500, "Server error"),
        ],
    },
    RouteDoc {
        method: "GET",
        path: "/assets/pokemons/{file}",
        summary: "Pokémon image",
        parameters: &[ParamDoc {
            name: "file",
            location: "path",
            required: true,
            description: "Image file name, e.g. 025.png",
        }],
        body: None,
        responses: &[(200, "Image bytes"), (404, "Asset not found")],
    },
];

/// Renders the welcome text, the HTML page and the OpenAPI document.
#[derive(Debug, Clone)]
pub struct ApiDocs {
    public_url: String,
}

impl ApiDocs {
    pub fn new(public_url: impl Into<String>) -> Self {
        Self {
            public_url: public_url.into(),
        }
    }

    /// Plain-text body of `GET /`.
    pub fn welcome_text(&self) -> String {
        format!(
            "Welcome to the Pokédex API! Documentation is available at {}/api-docs",
            self.public_url
        )
    }

    /// HTML body of `GET /api-docs`.
    pub fn html_page(&self) -> String {
        let mut rows = String::new();
        for route in ROUTES {
            rows.push_str(&format!(
                "      <tr><td><code>{}</code></td><td><code>{}</code></td><td>{}</td></tr>\n",
                route.method,
                escape_html(route.path),
                escape_html(route.summary)
            ));
        }
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>Pokédex API</title>
  </head>
  <body>
    <h1>Pokédex API</h1>
    <p>Base URL: <code>{url}</code>. Errors are returned as <code>{{"error": "..."}}</code>.</p>
    <table>
      <tr><th>Method</th><th>Path</th><th>Description</th></tr>
{rows}    </table>
    <p>Machine-readable description: <a href="{url}/api-docs/openapi.json">openapi.json</a></p>
  </body>
</html>
"#,
            url = escape_html(&self.public_url),
            rows = rows
        )
    }

    /// OpenAPI 3 description of every route.
    pub fn openapi_document(&self) -> Value {
        let mut paths = Map::new();
        for route in ROUTES {
            let entry = paths
                .entry(route.path.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(methods) = entry {
                methods.insert(route.method.to_lowercase(), operation(route));
            }
        }

        json!({
            "openapi": "3.0.3",
            "info": {
                "title": "Pokédex API",
                "version": env!("CARGO_PKG_VERSION"),
                "description": "CRUD API over a collection of Pokémon",
            },
            "servers": [{ "url": self.public_url }],
            "paths": paths,
            "components": {
                "schemas": {
                    "Pokemon": pokemon_schema(true),
                    "PokemonUpdate": pokemon_schema(false),
                    "Error": {
                        "type": "object",
                        "properties": { "error": { "type": "string" } },
                        "required": ["error"],
                    },
                }
            }
        })
    }
}

fn operation(route: &RouteDoc) -> Value {
    let parameters: Vec<Value> = route
        .parameters
        .iter()
        .map(|param| {
            let schema = if param.name == "id" || param.name == "page" {
                json!({ "type": "integer" })
            } else {
                json!({ "type": "string" })
            };
            json!({
                "name": param.name,
                "in": param.location,
                "required": param.required,
                "description": param.description,
                "schema": schema,
            })
        })
        .collect();

    let mut responses = Map::new();
    for (status, description) in route.responses {
        let mut response = json!({ "description": description });
        if *status >= 400 {
            response["content"] = json!({
                "application/json": { "schema": { "$ref": "#/components/schemas/Error" } }
            });
        }
        responses.insert(status.to_string(), response);
    }

    let mut operation = json!({
        "summary": route.summary,
        "parameters": parameters,
        "responses": responses,
    });
    if let Some(schema) = route.body {
        operation["requestBody"] = json!({
            "required": true,
            "content": {
                "application/json": {
                    "schema": { "$ref": format!("#/components/schemas/{}", schema) }
                }
            }
        });
    }
    operation
}

fn pokemon_schema(all_required: bool) -> Value {
    let stat = json!({ "type": "integer", "minimum": 0 });
    let name = json!({ "type": "string" });
    let mut schema = json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "id": { "type": "integer" },
            "name": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "english": name,
                    "french": name,
                    "japanese": name,
                    "chinese": name,
                },
            },
            "type": { "type": "array", "minItems": 1, "items": { "type": "string" } },
            "base": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "HP": stat,
                    "Attack": stat,
                    "Defense": stat,
                    "SpecialAttack": stat,
                    "SpecialDefense": stat,
                    "Speed": stat,
                },
                "required": ["HP", "Attack", "Defense", "SpecialAttack", "SpecialDefense", "Speed"],
            },
            "image": { "type": "string" },
        },
    });
    if all_required {
        schema["required"] = json!(["id", "name", "type", "base", "image"]);
    }
    schema
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
